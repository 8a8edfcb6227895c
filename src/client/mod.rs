//! HTTP gateway and the capabilities it depends on.
//!
//! The gateway owns request setup (headers, URL resolution), the
//! session-expiry flow and the `ProblemDetail` adapter. Storage, notices,
//! navigation and object URLs are traits so a hosting shell (browser, desktop
//! webview, terminal) supplies its own implementation.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod image;
pub mod navigation;
pub mod problem;
pub mod session;

pub use config::GatewayConfig;
pub use errors::GatewayError;
pub use gateway::{GatewayResponse, RequestGateway, RequestOptions};
pub use image::{BlobRegistry, ImageElement, ImageLoader, ObjectUrls};
pub use navigation::{
    FrameContext, LoginTarget, NavigationResolver, Notifier, StandaloneNavigator, TracingNotifier,
};
pub use problem::{FieldError, NormalizedError};
pub use session::{AuthSession, FileStore, MemoryStore, SessionStore};
