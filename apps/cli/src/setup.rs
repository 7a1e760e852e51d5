//! Builds configuration, client and driver from the global flags.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use wecreate_abstraction::GenerationClient;
use wecreate_client::{ClientFactory, ClientKind};
use wecreate_core::{StudioConfig, StudioDriver};

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub mock: bool,
    pub api_url: Option<String>,
    pub provider: Option<String>,
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Loads configuration files and environment, then applies CLI flags.
    pub fn load_config(&self) -> Result<StudioConfig> {
        let mut config =
            StudioConfig::load_with(self.config.as_deref()).context("Failed to load configuration")?;

        if let Some(url) = &self.api_url {
            config.service.base_url = Some(url.clone());
        }
        if let Some(provider) = &self.provider {
            config.service.provider = Some(provider.clone());
        }
        Ok(config)
    }

    /// Creates the generation client selected by the flags.
    pub fn client(&self, config: &StudioConfig) -> Result<Arc<dyn GenerationClient>> {
        let options = config.client_options().context("Invalid service configuration")?;
        let kind = if self.mock { ClientKind::Mock } else { ClientKind::Http };
        debug!(kind = ?kind, provider = %options.provider, "Selected generation backend");

        ClientFactory::create(kind, options).context("Failed to create generation client")
    }

    /// Creates a driver for a fresh article.
    pub fn driver(&self, config: &StudioConfig) -> Result<StudioDriver> {
        let settings = config.workflow_settings().context("Invalid finishing configuration")?;
        Ok(StudioDriver::new(self.client(config)?, settings))
    }
}
