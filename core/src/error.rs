use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Client '{id}' not found")]
    ClientNotFound { id: String },

    #[error("Client '{id}' missing required fields: {fields:?}")]
    MissingFields { id: String, fields: Vec<&'static str> },

    #[error("Primary interest '{raw}' does not map to a product option")]
    UnmappedInterest { raw: String },

    #[error("Bureau source unavailable: {reason}")]
    BureauUnavailable { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// True for errors the request-driven caller should report back to the
    /// client rather than retry: the input was wrong, not the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ClientNotFound { .. }
                | Self::MissingFields { .. }
                | Self::UnmappedInterest { .. }
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
