//! Remote query errors.

/// Error querying a remote repository.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// The request exceeded the client's timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
    /// Transport-level failure (DNS, connection, malformed body).
    #[error("http error: {0}")]
    Http(String),
    /// The server answered with an unexpected status code.
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    /// The response decoded but was missing the expected fields.
    #[error("invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RemoteError::Timeout {
            url: "https://example.com".to_string(),
            timeout_secs: 30,
        };
        assert_eq!(
            err.to_string(),
            "request to https://example.com timed out after 30s"
        );

        let err = RemoteError::Status {
            status: 503,
            url: "https://example.com".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 503 for https://example.com");
    }
}
