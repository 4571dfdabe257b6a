/// Errors that can occur during identity store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("failed to write {entity} {key}: {message}")]
    WriteFailed {
        entity: &'static str,
        key: String,
        message: String,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
