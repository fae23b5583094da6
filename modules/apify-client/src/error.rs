use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("request to Apify failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Apify returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected Apify payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("actor run {run_id} ended as {status}")]
    RunFailed { run_id: String, status: String },
}

impl ApifyError {
    /// Quota and auth failures will not clear up by retrying another URL.
    pub fn is_account_problem(&self) -> bool {
        matches!(self, ApifyError::Api { status: 401 | 402 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_quota_statuses_are_account_problems() {
        let err = ApifyError::Api {
            status: 402,
            message: "monthly usage hard limit exceeded".into(),
        };
        assert!(err.is_account_problem());
        assert_eq!(
            err.to_string(),
            "Apify returned 402: monthly usage hard limit exceeded"
        );

        let err = ApifyError::RunFailed {
            run_id: "abc".into(),
            status: "TIMED-OUT".into(),
        };
        assert!(!err.is_account_problem());
    }
}
