use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::mock::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to "txreview")
  pub title: Option<String>,
  #[serde(default)]
  pub provider: ProviderConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Directory for the log file (defaults to the user data directory)
  pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
  /// Built-in or file-backed fixture, no network
  #[default]
  Mock,
  /// JSON API at `base_url`
  Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
  #[serde(default)]
  pub kind: ProviderKind,
  pub base_url: Option<String>,
  /// Transactions per page served by the mock provider
  #[serde(default = "default_page_size")]
  pub page_size: usize,
  /// Simulated response latency of the mock provider
  #[serde(default = "default_latency_ms")]
  pub latency_ms: u64,
  /// Fixture file for the mock provider
  pub fixture: Option<PathBuf>,
}

impl Default for ProviderConfig {
  fn default() -> Self {
    Self {
      kind: ProviderKind::default(),
      base_url: None,
      page_size: default_page_size(),
      latency_ms: default_latency_ms(),
      fixture: None,
    }
  }
}

fn default_page_size() -> usize {
  DEFAULT_PAGE_SIZE
}

fn default_latency_ms() -> u64 {
  300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

fn default_true() -> bool {
  true
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./txreview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/txreview/config.yaml
  ///
  /// Falls back to defaults (mock provider) when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("txreview.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("txreview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;

    if config.provider.kind == ProviderKind::Http && config.provider.base_url.is_none() {
      return Err(eyre!("provider.base_url is required when provider.kind is http"));
    }

    Ok(config)
  }

  /// Header title
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("txreview")
  }

  /// Directory the log file is written to
  pub fn log_dir(&self) -> Result<PathBuf> {
    if let Some(dir) = &self.log_dir {
      return Ok(dir.clone());
    }

    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("txreview"))
  }

  /// Get the optional API token from the environment.
  ///
  /// Checks TXREVIEW_API_TOKEN.
  pub fn get_api_token() -> Option<String> {
    std::env::var("TXREVIEW_API_TOKEN")
      .ok()
      .filter(|token| !token.is_empty())
  }

  /// Apply command-line provider overrides. A fixture or `mock` wins over a URL.
  pub fn with_overrides(
    mut self,
    url: Option<String>,
    mock: bool,
    fixture: Option<PathBuf>,
  ) -> Self {
    if let Some(url) = url {
      self.provider.kind = ProviderKind::Http;
      self.provider.base_url = Some(url);
    }
    if mock || fixture.is_some() {
      self.provider.kind = ProviderKind::Mock;
    }
    if fixture.is_some() {
      self.provider.fixture = fixture;
    }
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config.provider.kind, ProviderKind::Mock);
    assert_eq!(config.provider.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.provider.latency_ms, 300);
    assert!(config.cache.enabled);
    assert_eq!(config.title(), "txreview");
  }

  #[test]
  fn test_http_config() {
    let config = Config::parse(
      r#"
title: Finance review
provider:
  kind: http
  base_url: https://api.example.com
cache:
  enabled: false
"#,
    )
    .unwrap();

    assert_eq!(config.provider.kind, ProviderKind::Http);
    assert_eq!(
      config.provider.base_url.as_deref(),
      Some("https://api.example.com")
    );
    assert!(!config.cache.enabled);
    assert_eq!(config.title(), "Finance review");
  }

  #[test]
  fn test_http_without_url_is_rejected() {
    assert!(Config::parse("provider:\n  kind: http\n").is_err());
  }

  #[test]
  fn test_mock_options() {
    let config = Config::parse(
      r#"
provider:
  page_size: 3
  latency_ms: 0
  fixture: ./data.json
log_dir: /tmp/txreview
"#,
    )
    .unwrap();

    assert_eq!(config.provider.page_size, 3);
    assert_eq!(config.provider.latency_ms, 0);
    assert_eq!(config.provider.fixture, Some(PathBuf::from("./data.json")));
    assert_eq!(config.log_dir().unwrap(), PathBuf::from("/tmp/txreview"));
  }

  #[test]
  fn test_url_override_switches_to_http() {
    let config =
      Config::default().with_overrides(Some("http://localhost:8080".to_string()), false, None);
    assert_eq!(config.provider.kind, ProviderKind::Http);
    assert_eq!(config.provider.base_url.as_deref(), Some("http://localhost:8080"));
  }

  #[test]
  fn test_mock_override_keeps_file_settings() {
    let config = Config::parse(
      "provider:\n  kind: http\n  base_url: https://api.example.com\n  page_size: 2\n",
    )
    .unwrap()
    .with_overrides(None, true, None);
    assert_eq!(config.provider.kind, ProviderKind::Mock);
    assert_eq!(config.provider.page_size, 2);
    assert!(config.provider.fixture.is_none());
  }

  #[test]
  fn test_fixture_override() {
    let config = Config::default().with_overrides(None, false, Some(PathBuf::from("data.json")));
    assert_eq!(config.provider.kind, ProviderKind::Mock);
    assert_eq!(config.provider.fixture, Some(PathBuf::from("data.json")));
  }

  #[test]
  fn test_missing_explicit_path() {
    assert!(Config::load(Some(Path::new("/nonexistent/txreview.yaml"))).is_err());
  }
}
