use thiserror::Error;

pub type Result<T> = std::result::Result<T, SuggestorError>;

#[derive(Error, Debug)]
pub enum SuggestorError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No data: {0}")]
    NoData(String),
}

impl SuggestorError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        SuggestorError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn json(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        SuggestorError::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
