//! Dashboard error types.
//!
//! Every failure mode has a named variant. Empty derived views (no
//! customers above the threshold, no positive-ROI actions) are ordinary
//! states, never errors; only the data boundary can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The prediction file is missing or unreadable. Terminal for the
    /// render cycle: nothing downstream may compute over it.
    #[error("prediction source unavailable at '{path}': {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A row failed to parse against the prediction table schema.
    #[error("malformed prediction row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    /// Writing the retention list export failed.
    #[error("failed to write retention list: {0}")]
    Export(#[from] csv::Error),
}

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;
