use thiserror::Error;

pub type Result<T> = std::result::Result<T, RemixError>;

#[derive(Debug, Error)]
pub enum RemixError {
    #[error("post {post} has no text to remix")]
    EmptyContent { post: String },

    #[error("post {post} has no video URL to transcribe")]
    NoVideoUrl { post: String },

    #[error("transcript not available for {url}")]
    TranscriptUnavailable { url: String },

    #[error("transcript lookup failed: {0:#}")]
    Transcript(#[source] anyhow::Error),

    #[error("completion failed: {0:#}")]
    Completion(#[source] anyhow::Error),
}

impl RemixError {
    /// The post itself cannot be remixed; retrying will not help.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            RemixError::EmptyContent { .. } | RemixError::NoVideoUrl { .. }
        )
    }
}
