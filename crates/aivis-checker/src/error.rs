use thiserror::Error;

/// Errors raised by the checker outside the query loop.
///
/// Query and authentication failures never surface here; they are recorded
/// as failed [`crate::VisibilityRecord`]s. Only exporting results can fail
/// the caller.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("failed to write export to {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
