use thiserror::Error;

#[derive(Debug, Error)]
pub enum KgError {
    #[error("Unknown concept: {0}")]
    UnknownConcept(String),

    #[error("Dependency edge {from} -> {to} references an unknown concept")]
    DanglingEdge { from: String, to: String },

    #[error("Invalid problem catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
