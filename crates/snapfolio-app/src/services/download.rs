// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Delivery of finished documents into an output directory.

use std::path::{Path, PathBuf};

use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::DocumentBlob;
use snapfolio_export::Download;
use tracing::{info, instrument};

/// Writes each blob to `<dir>/<filename>`, creating `dir` if needed.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Download for DirectoryDownload {
    #[instrument(skip(self, blob), fields(dir = %self.dir.display(), bytes = blob.len()))]
    async fn download(&self, blob: DocumentBlob, filename: &str) -> Result<()> {
        let target = self.dir.join(filename);
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| ExportError::Download(format!("{}: {err}", self.dir.display())))?;
        tokio::fs::write(&target, &blob.bytes)
            .await
            .map_err(|err| ExportError::Download(format!("{}: {err}", target.display())))?;
        info!(path = %target.display(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_into_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports").join("2026");
        let download = DirectoryDownload::new(&out);

        download
            .download(DocumentBlob::pdf(b"%PDF-1.7".to_vec()), "Minutes_x_2026-10-19.pdf")
            .await
            .unwrap();

        let written = std::fs::read(out.join("Minutes_x_2026-10-19.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn unwritable_target_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the directory should be.
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, b"").unwrap();

        let err = DirectoryDownload::new(&blocker)
            .download(DocumentBlob::pdf(Vec::new()), "out.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Download(_)));
    }
}
