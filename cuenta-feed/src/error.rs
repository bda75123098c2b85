//! Fetch error taxonomy for the two statement feeds.

use thiserror::Error;

/// Everything that can go wrong talking to a feed.
///
/// Parse failures are deliberately distinct from HTTP failures so the
/// view can tell a broken backend from a malformed payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network unreachable, connection reset, TLS failure, and friends.
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The configured request deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx response; the body is captured as text, best effort.
    #[error("HTTP {status} - {body}")]
    Http { status: u16, body: String },

    /// The response body was not the JSON shape the feed promises.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_carries_status_and_body() {
        let err = FetchError::Http {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502 - Bad Gateway");
    }

    #[test]
    fn test_parse_error_wraps_serde() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::from(inner);
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
