use thiserror::Error;

/// Errors surfaced by engine query operations.
///
/// Everything here is a client-side concern: the engine rejected or failed a
/// query, the transport broke, or a single-result query matched more than one
/// row. Assertion semantics (expected vs. actual state) live a layer above.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Engine rejected request with status {status}: {message}")]
    Engine { status: u16, message: String },

    #[error("Query for one {kind} matched {count} results")]
    NonUniqueResult { kind: &'static str, count: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
