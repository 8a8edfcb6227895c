use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server rejected the session for a protected endpoint. The session
    /// has already been cleared and the login redirect issued.
    #[error("Authentication expired")]
    AuthenticationExpired,
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("unable to reach the server: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session storage error: {0}")]
    Storage(String),
}

impl GatewayError {
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationExpired)
    }
}
