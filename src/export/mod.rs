//! Static export of a project: rasterized PNG and the paginated PDF
//! brand kit.
//!
//! Both sinks are pure consumers of a [`crate::store::ProjectRecord`]; they
//! never touch live rendering state. Failures are scoped per asset: a
//! missing or undecodable icon degrades the output and is logged, while a
//! document-level failure is a typed [`ExportError`] and never a partial
//! file presented as success.

pub mod layout;
pub mod pdf;
pub mod raster;

use thiserror::Error;

/// Document-level export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("generate brand content before exporting")]
    MissingContent,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

/// A finished export: the bytes plus the filename to offer for download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Derives a filename stem from the project name: whitespace runs collapse
/// to single underscores. An all-whitespace name falls back to `brand`.
pub fn file_stem(name: &str) -> String {
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() { "brand".to_string() } else { stem }
}
