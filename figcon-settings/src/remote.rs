//! Remote configuration API contract
//!
//! The settings store talks to the media server exclusively through
//! [`ConfigApi`], so tests substitute an in-process mock and the HTTP
//! transport stays swappable.

use async_trait::async_trait;
use thiserror::Error;

use crate::entry::SettingEntry;
use crate::value::SettingValue;

/// Remote configuration API errors
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Remote configuration API consumed by the settings store
#[async_trait]
pub trait ConfigApi: Send + Sync {
    /// Read one setting's current global (non-overlay) value as unparsed
    /// text.
    async fn get_setting(&self, id: &str) -> Result<String, RemoteError>;

    /// Write one setting, optionally scoped to an overlay.
    ///
    /// `reset` requests the server drop the overlay override so the entry
    /// inherits the global value again.
    async fn post_setting(
        &self,
        id: &str,
        value: &SettingValue,
        overlay_id: Option<&str>,
        reset: bool,
    ) -> Result<(), RemoteError>;

    /// Bulk fetch for initial population, optionally scoped to an overlay.
    async fn list_settings(&self, overlay_id: Option<&str>) -> Result<Vec<SettingEntry>, RemoteError>;

    /// Flush the server's in-memory configuration to durable storage.
    /// Invoked after every successful write.
    async fn trigger_persist(&self) -> Result<(), RemoteError>;
}
