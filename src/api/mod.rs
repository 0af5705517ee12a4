//! Data provider access: wire types, providers and the caching fetcher.

mod cache;
pub mod fetcher;
pub mod http;
pub mod mock;
pub mod provider;
pub mod types;

use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ProviderKind};

pub use fetcher::Fetcher;
pub use provider::{DataProvider, Operation};

/// Build the provider selected in the configuration.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn DataProvider>> {
  let settings = &config.provider;

  match settings.kind {
    ProviderKind::Mock => {
      let provider = match &settings.fixture {
        Some(path) => mock::MockProvider::from_file(path)?,
        None => mock::MockProvider::builtin()?,
      };
      Ok(Arc::new(
        provider
          .with_page_size(settings.page_size)
          .with_latency(Duration::from_millis(settings.latency_ms)),
      ))
    }
    ProviderKind::Http => {
      let base_url = settings
        .base_url
        .as_deref()
        .ok_or_else(|| eyre!("provider.base_url is required for the http provider"))?;
      Ok(Arc::new(http::HttpProvider::new(
        base_url,
        Config::get_api_token(),
      )?))
    }
  }
}
