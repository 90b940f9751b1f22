// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — the concrete collaborators the exporter runs against on
// the command line.

pub mod capture;
pub mod download;
pub mod feedback;
pub mod margin_host;
