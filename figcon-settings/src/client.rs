//! HTTP implementation of the remote configuration API

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use figcon_common::config::ConsoleConfig;

use crate::entry::SettingEntry;
use crate::remote::{ConfigApi, RemoteError};
use crate::value::{SettingKind, SettingValue};

const USER_AGENT: &str = "figcon/0.1.0 (+https://github.com/figcon/figcon)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// REST client for the media server's configuration endpoints
///
/// Endpoints:
/// - `GET  {base}/api/settings/{id}` — raw text of the global value
/// - `POST {base}/api/settings/{id}` — JSON `{value, overlay?, reset?}`
/// - `GET  {base}/api/settings?overlay={scope}` — JSON array of entries
/// - `POST {base}/api/settings/persist` — flush config to disk
pub struct RestConfigClient {
    http: reqwest::Client,
    base_url: String,
}

/// One settings entry as the server lists it
#[derive(Debug, Deserialize)]
struct WireSetting {
    id: String,
    #[serde(rename = "type")]
    kind: SettingKind,
    #[serde(default)]
    label: String,
    #[serde(default)]
    description: String,
    value: serde_json::Value,
    #[serde(default)]
    overlayed: Option<bool>,
}

/// Write request body for `POST /api/settings/{id}`
#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    value: &'a SettingValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<&'a str>,
    #[serde(skip_serializing_if = "is_false")]
    reset: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl RestConfigClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Build a client from the resolved console configuration.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, RemoteError> {
        Self::with_timeout(
            config.server_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success statuses onto the error taxonomy.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Api(status.as_u16(), body))
    }
}

#[async_trait]
impl ConfigApi for RestConfigClient {
    async fn get_setting(&self, id: &str) -> Result<String, RemoteError> {
        let url = self.url(&format!("/api/settings/{}", id));
        debug!(setting = %id, url = %url, "fetching global setting value");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Self::check(response)
            .await?
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))
    }

    async fn post_setting(
        &self,
        id: &str,
        value: &SettingValue,
        overlay_id: Option<&str>,
        reset: bool,
    ) -> Result<(), RemoteError> {
        let url = self.url(&format!("/api/settings/{}", id));
        debug!(setting = %id, overlay = ?overlay_id, reset, "writing setting");

        let response = self
            .http
            .post(&url)
            .json(&WriteRequest {
                value,
                overlay: overlay_id,
                reset,
            })
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn list_settings(&self, overlay_id: Option<&str>) -> Result<Vec<SettingEntry>, RemoteError> {
        let url = self.url("/api/settings");
        debug!(overlay = ?overlay_id, "listing settings");

        let mut request = self.http.get(&url);
        if let Some(overlay) = overlay_id {
            request = request.query(&[("overlay", overlay)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let wire: Vec<WireSetting> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        Ok(wire.into_iter().map(entry_from_wire).collect())
    }

    async fn trigger_persist(&self) -> Result<(), RemoteError> {
        let url = self.url("/api/settings/persist");
        debug!("triggering config persist");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }
}

/// Decode one listed entry, degrading a malformed value to the kind's zero
/// value rather than failing the whole listing.
fn entry_from_wire(wire: WireSetting) -> SettingEntry {
    let value = SettingValue::from_wire(wire.kind, &wire.value).unwrap_or_else(|| {
        warn!(
            setting = %wire.id,
            value = %wire.value,
            kind = ?wire.kind,
            "listed value does not match its declared type, using default"
        );
        wire.kind.default_value()
    });

    let mut entry = SettingEntry::new(wire.id, wire.kind, wire.label, wire.description, value);
    entry.overlayed = wire.overlayed;
    entry
}
