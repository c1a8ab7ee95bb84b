//! Renderers that turn an [`Assessment`](crate::core::Assessment) into files.
//!
//! None of these mutate the assessment. Amounts are rounded and formatted
//! through `core::format` so every artifact shows the same figures.

pub mod ics;
pub mod invoice;
pub mod pdf;

use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "Pinoy Tax Assistant";
pub const APP_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Kailangan munang mag-register sa BIR bago makapag-export.")]
    Unregistered,
    #[error("Walang due dates na pwedeng i-export.")]
    NoDueDates,
    #[error("PDF layout not found: {}. Please check the templates directory.", .0.display())]
    LayoutNotFound(PathBuf),
    #[error("PDF layout {} has no {{{{sections}}}} placeholder", .0.display())]
    InvalidLayout(PathBuf),
    #[error("PDF rendering failed: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Write `contents` to `dir/filename`, creating `dir` if needed.
pub fn write_artifact(dir: &Path, filename: &str, contents: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, contents)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}
