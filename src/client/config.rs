//! Gateway configuration selected once at startup from the page origin, with
//! an optional explicit API base override. The config is shared by reference;
//! nothing here is mutated after construction. Values are public, do not store
//! secrets here.

use super::errors::GatewayError;
use tracing::debug;
use url::Url;

/// Header added to every outbound request so tunnelled dev hosts skip their
/// interstitial page.
pub const BYPASS_HEADER: &str = "ngrok-skip-browser-warning";
pub const BYPASS_HEADER_VALUE: &str = "true";

/// API base used when the page is served from a production host.
pub const PRODUCTION_API_BASE_URL: &str = "https://api.buka.tw/api";
const PRODUCTION_HOSTS: [&str; 2] = ["buka.tw", "www.buka.tw"];
/// API path relative to the page origin on every other host.
const ORIGIN_API_PATH: &str = "/api";

/// Endpoints that answer 401/403 as part of their normal contract (bad
/// credentials, public reads) and must not trigger the session-expiry flow.
pub const DEFAULT_AUTH_ALLOW_LIST: [&str; 6] = [
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
    "/api/tickets/categories",
    "/api/shields/products",
];

pub const LOGIN_PAGE: &str = "/index.html";
pub const DASHBOARD_LOGIN_PAGE: &str = "/dashboard.html";
/// Marker looked up in the parent frame path to pick the dashboard login page.
pub const DASHBOARD_MARKER: &str = "dashboard";

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub api_base_url: String,
    pub auth_allow_list: Vec<String>,
    pub login_page: String,
    pub dashboard_login_page: String,
}

impl GatewayConfig {
    /// Selects the API base from the origin the front end is served from.
    #[must_use]
    pub fn for_origin(origin: &Url) -> Self {
        let api_base_url = match origin.host_str() {
            Some(host) if PRODUCTION_HOSTS.contains(&host) => PRODUCTION_API_BASE_URL.to_string(),
            _ => origin
                .join(ORIGIN_API_PATH)
                .map_or_else(|_| ORIGIN_API_PATH.to_string(), |url| url.to_string()),
        };

        debug!("API base URL: {}", api_base_url);

        Self {
            api_base_url,
            auth_allow_list: DEFAULT_AUTH_ALLOW_LIST
                .iter()
                .map(ToString::to_string)
                .collect(),
            login_page: LOGIN_PAGE.to_string(),
            dashboard_login_page: DASHBOARD_LOGIN_PAGE.to_string(),
        }
    }

    /// Replaces the API base when a non-empty override is given.
    #[must_use]
    pub fn with_api_base_url(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value.and_then(normalize_value) {
            self.api_base_url = value;
        }
        self
    }

    #[must_use]
    pub fn with_allow_list<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth_allow_list = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Substring match of every allow-listed path against the request URL.
    /// `"/api/auth/login"` also exempts `"/api/auth/login-history"`.
    #[must_use]
    pub fn is_allow_listed(&self, url: &str) -> bool {
        self.auth_allow_list
            .iter()
            .any(|path| !path.is_empty() && url.contains(path.as_str()))
    }

    /// Resolves a request URL: absolute URLs pass through, anything else is
    /// joined onto the API base.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidUrl`] if the result is not an absolute URL.
    pub fn resolve_url(&self, url: &str) -> Result<Url, GatewayError> {
        let url = url.trim();
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }

        let joined = build_url_with_base(&self.api_base_url, url);
        Url::parse(&joined).map_err(|source| GatewayError::InvalidUrl {
            url: joined,
            source,
        })
    }
}

/// Joins a base URL and a path with exactly one slash between them.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(value: &str) -> Url {
        Url::parse(value).unwrap()
    }

    #[test]
    fn production_hosts_use_api_subdomain() {
        for host in ["https://buka.tw", "https://www.buka.tw/admin/"] {
            let config = GatewayConfig::for_origin(&origin(host));
            assert_eq!(config.api_base_url, PRODUCTION_API_BASE_URL);
        }
    }

    #[test]
    fn other_hosts_use_origin_api_path() {
        let config = GatewayConfig::for_origin(&origin("http://localhost:8080/dashboard.html"));
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
    }

    #[test]
    fn api_base_override_ignores_blank_values() {
        let config = GatewayConfig::for_origin(&origin("http://localhost:8080"))
            .with_api_base_url(Some("   "));
        assert_eq!(config.api_base_url, "http://localhost:8080/api");

        let config = config.with_api_base_url(Some(" https://staging.buka.tw/api "));
        assert_eq!(config.api_base_url, "https://staging.buka.tw/api");
    }

    #[test]
    fn allow_list_is_substring_based() {
        let config = GatewayConfig::for_origin(&origin("http://localhost"));
        assert!(config.is_allow_listed("http://localhost/api/auth/login"));
        assert!(config.is_allow_listed("http://localhost/api/auth/login-history"));
        assert!(config.is_allow_listed("https://api.buka.tw/api/shields/products?page=2"));
        assert!(!config.is_allow_listed("http://localhost/api/members/me"));
    }

    #[test]
    fn empty_allow_list_entries_never_match() {
        let config = GatewayConfig::for_origin(&origin("http://localhost")).with_allow_list([""]);
        assert!(!config.is_allow_listed("http://localhost/api/auth/login"));
    }

    #[test]
    fn resolve_url_joins_relative_paths() {
        let config = GatewayConfig::for_origin(&origin("http://localhost:8080"));
        assert_eq!(
            config.resolve_url("/tickets?page=1").unwrap().as_str(),
            "http://localhost:8080/api/tickets?page=1"
        );
        assert_eq!(
            config.resolve_url("tickets").unwrap().as_str(),
            "http://localhost:8080/api/tickets"
        );
        assert_eq!(
            config.resolve_url("https://cdn.buka.tw/a.png").unwrap().as_str(),
            "https://cdn.buka.tw/a.png"
        );
    }

    #[test]
    fn resolve_url_rejects_relative_base() {
        let config = GatewayConfig::for_origin(&origin("http://localhost"))
            .with_api_base_url(Some("/api"));
        assert!(matches!(
            config.resolve_url("/tickets"),
            Err(GatewayError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn build_url_with_base_handles_slashes() {
        assert_eq!(build_url_with_base("https://a/api/", "/x"), "https://a/api/x");
        assert_eq!(build_url_with_base("", "/x"), "/x");
        assert_eq!(build_url_with_base("https://a/api", ""), "https://a/api");
    }
}
