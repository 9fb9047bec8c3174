//! Error types for the disambiguation engine.

/// Errors raised while configuring or running a disambiguation.
#[derive(Debug, thiserror::Error)]
pub enum DisambiguationError {
    /// A similarity, selection or MeSH threshold is negative or not finite.
    #[error("invalid threshold `{name}`: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// A selection or clustering weight is not finite.
    #[error("invalid weight `{name}`: {value}")]
    InvalidWeight { name: String, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    /// No identity is known under the key.
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    /// A collaborator (article source, gold standard or degree store) failed.
    #[error("lookup failed in {source_name}: {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CBOR error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias for Results using [`DisambiguationError`].
pub type Result<T> = std::result::Result<T, DisambiguationError>;
