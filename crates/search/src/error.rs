use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while loading search configuration.
///
/// Scoring itself never fails; an unusable input degrades to an empty result.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config is not valid JSON or TOML: {0}")]
    Parse(String),

    #[error("Unknown config keys: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),

    #[error("schema_version {0} is not supported (expected 1)")]
    UnsupportedSchema(u32),

    #[error("Invalid category table: {0}")]
    InvalidTable(String),
}

impl SearchError {
    pub fn invalid_table(msg: impl Into<String>) -> Self {
        Self::InvalidTable(msg.into())
    }
}
