/// Result type for file, network and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the I/O and network boundaries.
///
/// Parsing a description never produces one of these; an unrecognizable
/// description is an empty `TranscriptRecord`, not an error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pronunciation lookup error: {0}")]
    Lookup(String),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
