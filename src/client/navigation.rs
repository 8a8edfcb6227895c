//! Capabilities the hosting shell provides for the session-expiry flow: a way
//! to show a notice and a way to send the user to the login page.

use super::config::{GatewayConfig, DASHBOARD_MARKER};
use std::sync::Mutex;
use tracing::{info, warn};

/// Message shown when the server rejects the stored session.
pub const SESSION_EXPIRED_NOTICE: &str = "登入已過期，請重新登入";

/// Where the current view lives relative to its parent browsing context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameContext {
    pub framed: bool,
    pub parent_path: Option<String>,
}

impl FrameContext {
    #[must_use]
    pub fn top_level() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn framed_in(parent_path: impl Into<String>) -> Self {
        Self {
            framed: true,
            parent_path: Some(parent_path.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginTarget {
    /// Navigate the current context.
    Current(String),
    /// Navigate the embedding parent context.
    Parent(String),
}

impl LoginTarget {
    /// Picks the login page: framed views reload their parent, choosing the
    /// dashboard login when the parent path carries the dashboard marker.
    #[must_use]
    pub fn resolve(config: &GatewayConfig, frame: &FrameContext) -> Self {
        if !frame.framed {
            return Self::Current(config.login_page.clone());
        }

        let in_dashboard = frame
            .parent_path
            .as_deref()
            .is_some_and(|path| path.contains(DASHBOARD_MARKER));

        if in_dashboard {
            Self::Parent(config.dashboard_login_page.clone())
        } else {
            Self::Parent(config.login_page.clone())
        }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        match self {
            Self::Current(location) | Self::Parent(location) => location,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

pub trait NavigationResolver: Send + Sync {
    fn frame_context(&self) -> FrameContext;
    fn navigate(&self, target: &LoginTarget);
}

/// Sends notices to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Navigator for shells with no embedding parent. It records the last target
/// so callers (the CLI, tests) can report it.
#[derive(Debug, Default)]
pub struct StandaloneNavigator {
    frame: FrameContext,
    last: Mutex<Option<LoginTarget>>,
}

impl StandaloneNavigator {
    #[must_use]
    pub fn new(frame: FrameContext) -> Self {
        Self {
            frame,
            last: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn last_target(&self) -> Option<LoginTarget> {
        self.last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl NavigationResolver for StandaloneNavigator {
    fn frame_context(&self) -> FrameContext {
        self.frame.clone()
    }

    fn navigate(&self, target: &LoginTarget) {
        info!("login required, redirecting to {}", target.location());
        *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(target.clone());
    }
}
