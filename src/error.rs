use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using this crate's [Error].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the pipeline stages. No stage catches an earlier
/// stage's error; everything propagates to the caller unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// Geocoding returned no candidate classified as a relation.
    #[error("no resolvable search area for {0:?}")]
    Resolution(String),

    /// A collaborator answered with a non-success HTTP status.
    #[error("fetch failed with HTTP status {status}")]
    Fetch { status: u16 },

    /// A collaborator response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A persisted record file is missing.
    #[error("record file not found: {0}")]
    Read(PathBuf),

    /// Transport-level failure (connection, timeout, redirect loop).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record file holds invalid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A grouping value with no entry in the fixed color palette.
    #[error("no color defined for {column} value {value:?}")]
    Palette { column: &'static str, value: String },

    /// Export format selector outside the two known values.
    #[error("unsupported export format {0:?}")]
    UnsupportedFormat(String),

    /// The plotting backend rejected a drawing operation.
    #[error("render error: {0}")]
    Render(String),

    /// The geo file writer rejected the output.
    #[error("export error: {0}")]
    Export(String),
}
