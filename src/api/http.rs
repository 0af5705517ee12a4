use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use url::Url;

use super::provider::{DataProvider, Operation};

/// Provider backed by a JSON-over-HTTP API.
///
/// Each operation is a `POST {base_url}/{operation}` with the params as the
/// request body.
#[derive(Clone)]
pub struct HttpProvider {
  client: reqwest::Client,
  base_url: Url,
  token: Option<String>,
}

impl HttpProvider {
  pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
    // Url::join replaces the last segment unless the base ends with a slash
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };

    let base_url =
      Url::parse(&normalized).map_err(|e| eyre!("Invalid API url {}: {}", base_url, e))?;

    let client = reqwest::Client::builder()
      .user_agent(concat!("txreview/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      base_url,
      token,
    })
  }

  fn endpoint(&self, operation: Operation) -> Result<Url> {
    self
      .base_url
      .join(operation.as_str())
      .map_err(|e| eyre!("Failed to build url for {}: {}", operation, e))
  }
}

impl DataProvider for HttpProvider {
  fn call(&self, operation: Operation, params: Value) -> BoxFuture<'static, Result<Value>> {
    let client = self.client.clone();
    let token = self.token.clone();
    let endpoint = self.endpoint(operation);

    async move {
      let mut request = client.post(endpoint?).json(&params);
      if let Some(token) = token {
        request = request.bearer_auth(token);
      }

      let response = request
        .send()
        .await
        .map_err(|e| eyre!("Request {} failed: {}", operation, e))?;

      let status = response.status();
      if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("Request {} failed with {}: {}", operation, status, body));
      }

      let bytes = response
        .bytes()
        .await
        .map_err(|e| eyre!("Failed to read {} response: {}", operation, e))?;

      if bytes.is_empty() {
        return Ok(Value::Null);
      }

      serde_json::from_slice(&bytes).map_err(|e| eyre!("Failed to parse {} response: {}", operation, e))
    }
    .boxed()
  }

  fn describe(&self) -> String {
    self.base_url.as_str().trim_end_matches('/').to_string()
  }
}
