//! Request gateway for the admin JSON API. All calls go through
//! [`RequestGateway::fetch_with_auth`] so header injection, the session-expiry
//! flow and error-body normalization stay in one place.

use super::{
    config::{GatewayConfig, BYPASS_HEADER, BYPASS_HEADER_VALUE},
    errors::GatewayError,
    navigation::{LoginTarget, NavigationResolver, Notifier, SESSION_EXPIRED_NOTICE},
    problem::{self, NormalizedError},
    session::{AuthSession, SessionStore},
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument};
use url::Url;

/// Per-request options; caller headers win over the injected ones.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn json(method: Method, body: Value) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn has_header(&self, name: &HeaderName) -> bool {
        self.headers
            .iter()
            .any(|(candidate, _)| candidate.eq_ignore_ascii_case(name.as_str()))
    }
}

pub struct RequestGateway {
    client: Client,
    config: Arc<GatewayConfig>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn NavigationResolver>,
}

impl RequestGateway {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: Arc<GatewayConfig>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn NavigationResolver>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            config,
            store,
            notifier,
            navigator,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Arc<GatewayConfig> {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Sends a request with the bypass header merged into the caller's headers.
    ///
    /// A `401`/`403` from an endpoint outside the allow-list clears the
    /// session, shows the expiry notice, redirects to the login page and
    /// returns [`GatewayError::AuthenticationExpired`]. Every other status is
    /// returned to the caller; failed responses expose the normalized body
    /// through [`GatewayResponse::json`].
    ///
    /// # Errors
    /// Returns an error on session expiry, invalid URLs or headers, and
    /// transport failures.
    pub async fn fetch_with_auth(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<GatewayResponse, GatewayError> {
        let url = self.config.resolve_url(url)?;
        let headers = merge_headers(&options.headers)?;

        let span = info_span!(
            "gateway.fetch",
            http.method = %options.method,
            url = %url
        );

        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().instrument(span).await?;
        let status = response.status();
        debug!("{} {} -> {}", options.method, url, status);

        if is_auth_failure(status) && !self.config.is_allow_listed(url.as_str()) {
            self.expire_session();
            return Err(GatewayError::AuthenticationExpired);
        }

        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response.bytes().await?.to_vec();

        Ok(GatewayResponse {
            status,
            headers,
            url: final_url,
            body,
        })
    }

    /// Same as [`fetch_with_auth`](Self::fetch_with_auth), adding
    /// `Authorization: Bearer <token>` when a session exists and the caller
    /// did not set the header.
    ///
    /// # Errors
    /// See [`fetch_with_auth`](Self::fetch_with_auth).
    pub async fn fetch_authenticated(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<GatewayResponse, GatewayError> {
        let token = AuthSession::bearer_token(self.store.as_ref());
        let options = if token.is_empty() || options.has_header(&AUTHORIZATION) {
            options
        } else {
            options.header(AUTHORIZATION.as_str(), format!("Bearer {token}"))
        };

        self.fetch_with_auth(url, options).await
    }

    /// Clears the session and sends the user to the login page. Safe to run
    /// more than once.
    fn expire_session(&self) {
        if let Err(err) = AuthSession::clear(self.store.as_ref()) {
            error!("failed to clear session: {}", err);
        }

        self.notifier.notify(SESSION_EXPIRED_NOTICE);

        let target = LoginTarget::resolve(&self.config, &self.navigator.frame_context());
        self.navigator.navigate(&target);
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Bypass header first, then caller headers replacing any same-named entry.
fn merge_headers(headers: &[(String, String)]) -> Result<HeaderMap, GatewayError> {
    let mut merged = HeaderMap::new();
    merged.insert(
        HeaderName::from_static(BYPASS_HEADER),
        HeaderValue::from_static(BYPASS_HEADER_VALUE),
    );

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| GatewayError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| GatewayError::InvalidHeader(name.to_string()))?;
        merged.insert(name, value);
    }

    Ok(merged)
}

/// Buffered response returned by the gateway.
#[derive(Clone, Debug)]
pub struct GatewayResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: Vec<u8>,
}

impl GatewayResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Failed responses get the `ProblemDetail` adapter on [`json`](Self::json).
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.as_u16() >= 400
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body. For failed responses this never errors: invalid JSON
    /// yields `{}` and `ProblemDetail` fields are mapped.
    ///
    /// # Errors
    /// Returns [`GatewayError::Json`] if a successful response is not JSON.
    pub fn json(&self) -> Result<Value, GatewayError> {
        if self.is_error() {
            return Ok(problem::parse_error_body(&self.body));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserializes a successful body into `T`.
    ///
    /// # Errors
    /// Returns [`GatewayError::Json`] if the body does not match `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Typed error body; `None` for non-error statuses.
    #[must_use]
    pub fn normalized_error(&self) -> Option<NormalizedError> {
        self.is_error()
            .then(|| NormalizedError::from_value(&problem::parse_error_body(&self.body)))
    }
}
