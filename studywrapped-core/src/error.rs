//! Error types for studywrapped-core

use thiserror::Error;

/// Main error type for the studywrapped-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Missing, unparseable, or rejected credential
    #[error("authentication error: {0}")]
    Auth(String),

    /// Non-success response from the QBank reports API
    #[error("upstream fetch error ({status}): {body}")]
    UpstreamFetch { status: u16, body: String },

    /// HTTP transport failure reaching the reports API
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Store error
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP-style status classification for the presentation boundary.
    ///
    /// Only two classes reach the caller: 401 for anything the user can
    /// fix by re-authenticating, 500 for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Auth(_) => 401,
            Error::UpstreamFetch { status: 401, .. } | Error::UpstreamFetch { status: 403, .. } => {
                401
            }
            _ => 500,
        }
    }

    /// Human-readable message for the presentation boundary.
    pub fn user_message(&self) -> &'static str {
        match self.status_code() {
            401 => "Your session has expired. Please sign in again.",
            _ => "Something went wrong while building your recap. Please try again.",
        }
    }
}

/// Result type alias for studywrapped-core
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_maps_to_401() {
        let err = Error::Auth("bad token".into());
        assert_eq!(err.status_code(), 401);
        assert!(err.user_message().contains("sign in"));
    }

    #[test]
    fn test_upstream_401_maps_to_401() {
        let err = Error::UpstreamFetch {
            status: 401,
            body: "expired".into(),
        };
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let err = Error::UpstreamFetch {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.status_code(), 500);
        let err = Error::Config("missing base_url".into());
        assert_eq!(err.status_code(), 500);
    }
}
