// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration: per-kind options plus capture settings, persisted as JSON.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{
    Color, DocumentKind, ExportMode, FooterFormat, MarginSet, Orientation, PaperSize,
};

/// Page budget for material listings.
const MATERIAL_LIST_PAGES: NonZeroUsize = NonZeroUsize::new(2).unwrap();

/// Options for one export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub mode: ExportMode,
    pub page_size: PaperSize,
    pub orientation: Orientation,
    /// Margins the dialog opens with.
    pub default_margins: MarginSet,
    /// Page footer; `None` draws no footer.
    pub footer: Option<FooterFormat>,
    /// Paint the top and bottom margins so neighbouring bands don't show through.
    pub mask_margins: bool,
    /// Capture again after the margins are confirmed.
    pub recapture_on_confirm: bool,
}

impl ExportOptions {
    /// Preset for a document kind.
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Minutes | DocumentKind::DailyReport => Self::default(),
            DocumentKind::MaterialList => Self {
                mode: ExportMode::FixedPages(MATERIAL_LIST_PAGES),
                footer: None,
                ..Self::default()
            },
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mode: ExportMode::FlowFit,
            page_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            default_margins: MarginSet::default(),
            footer: Some(FooterFormat::default()),
            mask_margins: true,
            recapture_on_confirm: false,
        }
    }
}

/// Persistent export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Device-pixel ratio requested from the capture collaborator.
    pub capture_scale: f32,
    /// Background behind transparent pixels and under masked margins.
    pub background: Color,
    /// Where finished documents are written.
    pub output_dir: PathBuf,
    pub minutes: ExportOptions,
    pub material_list: ExportOptions,
    pub daily_report: ExportOptions,
}

impl ExportConfig {
    /// Options for a document kind.
    pub fn options(&self, kind: DocumentKind) -> &ExportOptions {
        match kind {
            DocumentKind::Minutes => &self.minutes,
            DocumentKind::MaterialList => &self.material_list,
            DocumentKind::DailyReport => &self.daily_report,
        }
    }

    /// Mutable options for a document kind.
    pub fn options_mut(&mut self, kind: DocumentKind) -> &mut ExportOptions {
        match kind {
            DocumentKind::Minutes => &mut self.minutes,
            DocumentKind::MaterialList => &mut self.material_list,
            DocumentKind::DailyReport => &mut self.daily_report,
        }
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let config = serde_json::from_str(&data)?;
        info!(path = %path.display(), "loaded export config");
        Ok(config)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            capture_scale: 2.0,
            background: Color::WHITE,
            output_dir: PathBuf::from("."),
            minutes: ExportOptions::for_kind(DocumentKind::Minutes),
            material_list: ExportOptions::for_kind(DocumentKind::MaterialList),
            daily_report: ExportOptions::for_kind(DocumentKind::DailyReport),
        }
    }
}
