//! Authenticated image loading. Protected images cannot be referenced by URL
//! directly, so they are fetched with the bearer token and handed to the view
//! as object URLs. Failures degrade to alt text and a log line.

use super::{
    config::{GatewayConfig, BYPASS_HEADER, BYPASS_HEADER_VALUE},
    gateway::RequestGateway,
    session::{AuthSession, SessionStore},
};
use reqwest::{header::CONTENT_TYPE, Client};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

pub const IMAGE_LOAD_FAILED_ALT: &str = "圖片載入失敗";
const OBJECT_URL_SCHEME: &str = "blob:";

/// Creates and releases object URLs for fetched payloads.
pub trait ObjectUrls: Send + Sync {
    fn create(&self, payload: Vec<u8>, content_type: Option<String>) -> String;
    fn revoke(&self, url: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// In-memory object URL registry issuing `blob:<uuid>` URLs.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    blobs: Mutex<HashMap<String, Blob>>,
}

impl BlobRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        self.blobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<Blob> {
        self.blobs().get(url).cloned()
    }

    /// Outstanding (created and not yet revoked) URLs.
    #[must_use]
    pub fn live(&self) -> usize {
        self.blobs().len()
    }
}

impl ObjectUrls for BlobRegistry {
    fn create(&self, payload: Vec<u8>, content_type: Option<String>) -> String {
        let url = format!("{OBJECT_URL_SCHEME}{}", Uuid::new_v4());
        self.blobs().insert(
            url.clone(),
            Blob {
                content_type,
                bytes: payload,
            },
        );
        url
    }

    fn revoke(&self, url: &str) {
        self.blobs().remove(url);
    }
}

/// The parts of an `<img>` the loader touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageElement {
    pub src: Option<String>,
    pub alt: String,
}

/// Drops the query string; signed or cache-busting parameters are not sent.
#[must_use]
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

pub struct ImageLoader {
    client: Client,
    config: Arc<GatewayConfig>,
    store: Arc<dyn SessionStore>,
    urls: Arc<dyn ObjectUrls>,
}

impl RequestGateway {
    /// Image loader sharing this gateway's client, config and session store.
    #[must_use]
    pub fn image_loader(&self, urls: Arc<dyn ObjectUrls>) -> ImageLoader {
        ImageLoader {
            client: self.client().clone(),
            config: Arc::clone(self.config()),
            store: Arc::clone(self.store()),
            urls,
        }
    }
}

impl ImageLoader {
    /// Loads `url` into `img`, revoking the object URL it held before.
    /// On failure only the alt text changes.
    pub async fn load_image(&self, img: &mut ImageElement, url: &str) {
        match self.fetch_blob(url).await {
            Some((bytes, content_type)) => {
                if let Some(previous) = img
                    .src
                    .take()
                    .filter(|src| src.starts_with(OBJECT_URL_SCHEME))
                {
                    self.urls.revoke(&previous);
                }
                img.src = Some(self.urls.create(bytes, content_type));
            }
            None => img.alt = IMAGE_LOAD_FAILED_ALT.to_string(),
        }
    }

    /// Fetches `url` and returns a new object URL. The caller owns it and must
    /// revoke it once it is no longer displayed.
    pub async fn get_image_url(&self, url: &str) -> Option<String> {
        let (bytes, content_type) = self.fetch_blob(url).await?;
        Some(self.urls.create(bytes, content_type))
    }

    async fn fetch_blob(&self, url: &str) -> Option<(Vec<u8>, Option<String>)> {
        let clean_url = strip_query(url);
        let resolved = match self.config.resolve_url(clean_url) {
            Ok(resolved) => resolved,
            Err(err) => {
                error!("failed to load image {}: {}", url, err);
                return None;
            }
        };

        let token = AuthSession::bearer_token(self.store.as_ref());
        let span = info_span!("gateway.image", url = %resolved);

        let response = self
            .client
            .get(resolved.clone())
            .header(BYPASS_HEADER, BYPASS_HEADER_VALUE)
            .bearer_auth(token)
            .send()
            .instrument(span)
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                error!("failed to load image: {} {}", response.status(), resolved);
                return None;
            }
            Err(err) => {
                error!("failed to load image {}: {}", url, err);
                return None;
            }
        };

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        match response.bytes().await {
            Ok(bytes) => Some((bytes.to_vec(), content_type)),
            Err(err) => {
                error!("failed to read image {}: {}", resolved, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_query_keeps_path() {
        assert_eq!(
            strip_query("/api/files/a.png?token=abc&v=2"),
            "/api/files/a.png"
        );
        assert_eq!(strip_query("/api/files/a.png"), "/api/files/a.png");
        assert_eq!(strip_query("?only=query"), "");
    }

    #[test]
    fn registry_creates_and_revokes() {
        let registry = BlobRegistry::new();
        let url = registry.create(vec![1, 2, 3], Some("image/png".to_string()));

        assert!(url.starts_with("blob:"));
        assert_eq!(registry.live(), 1);
        assert_eq!(registry.get(&url).unwrap().bytes, vec![1, 2, 3]);

        registry.revoke(&url);
        registry.revoke(&url);
        assert_eq!(registry.live(), 0);
    }
}
