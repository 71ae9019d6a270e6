//! Error taxonomy for external fetches.
//!
//! One rule governs everything here: a failure local to one fetch unit never
//! unwinds a batch. Adapters return `Result<T, FetchError>` and the batch
//! layer converts errors into logged empty results. Empty selections, skipped
//! local files, and empty suggestion sets are ordinary values, not errors.

/// A registry or ontology fetch failed for one unit of work.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Cannot reach {0}")]
    Connection(String),

    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Service returned error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Map a reqwest error into the taxonomy. Connect and timeout failures
    /// stay distinguishable from HTTP status errors.
    pub fn from_reqwest(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_connect() {
            FetchError::Connection(url.to_string())
        } else if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                seconds: timeout_secs,
            }
        } else {
            FetchError::ResponseParsing(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = FetchError::Http {
            status: 404,
            body: "panel not found".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("panel not found"));
    }

    #[test]
    fn timeout_display_names_url() {
        let err = FetchError::Timeout {
            url: "https://registry.example/panels/12/".into(),
            seconds: 10,
        };
        assert!(err.to_string().contains("panels/12"));
        assert!(err.to_string().contains("10s"));
    }
}
