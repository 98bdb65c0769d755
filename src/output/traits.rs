//! Output sink trait and error types

use crate::output::dataset::Dataset;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for a finished dataset
///
/// A sink receives the whole unified table at once; it is called only after
/// every fetch has completed.
pub trait DatasetSink {
    /// Persists `dataset`, replacing earlier contents
    fn write(&self, dataset: &Dataset) -> OutputResult<()>;
}
