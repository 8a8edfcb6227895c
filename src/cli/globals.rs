use crate::{
    cli::commands::{ARG_API_BASE_URL, ARG_FRAMED_IN, ARG_ORIGIN, ARG_SESSION_FILE},
    client::{
        FileStore, FrameContext, GatewayConfig, RequestGateway, StandaloneNavigator,
        TracingNotifier,
    },
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use url::Url;

/// Arguments shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub origin: String,
    pub api_base_url: Option<String>,
    pub session_file: PathBuf,
    pub framed_in: Option<String>,
}

impl GlobalArgs {
    /// # Errors
    /// Returns an error if a defaulted argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        Ok(Self {
            origin: matches
                .get_one::<String>(ARG_ORIGIN)
                .cloned()
                .context("missing required argument: --origin")?,
            api_base_url: matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
            session_file: matches
                .get_one::<String>(ARG_SESSION_FILE)
                .map(PathBuf::from)
                .context("missing required argument: --session-file")?,
            framed_in: matches.get_one::<String>(ARG_FRAMED_IN).cloned(),
        })
    }

    /// # Errors
    /// Returns an error if the origin is not an absolute URL.
    pub fn config(&self) -> Result<GatewayConfig> {
        let origin = Url::parse(&self.origin)
            .with_context(|| format!("invalid origin: {}", self.origin))?;

        Ok(GatewayConfig::for_origin(&origin).with_api_base_url(self.api_base_url.as_deref()))
    }

    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::new(self.session_file.clone())
    }

    #[must_use]
    pub fn frame(&self) -> FrameContext {
        self.framed_in
            .as_deref()
            .map_or_else(FrameContext::top_level, FrameContext::framed_in)
    }

    /// Gateway backed by the session file, logging notices and redirects.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn gateway(&self) -> Result<RequestGateway> {
        let gateway = RequestGateway::new(
            Arc::new(self.config()?),
            Arc::new(self.store()),
            Arc::new(TracingNotifier),
            Arc::new(StandaloneNavigator::new(self.frame())),
        )?;

        Ok(gateway)
    }
}
