//! # FigCon Settings Engine
//!
//! Settings synchronization with overlay resolution for the figurine
//! console. The engine reconciles local edit state against the media
//! server's configuration API:
//! - [`SettingsStore`] owns the in-memory working set, tracks pending edits
//!   against last-known-server baselines, and notifies subscribers
//! - [`ConfigApi`] is the remote configuration contract;
//!   [`RestConfigClient`] is its HTTP implementation
//! - [`FieldBinding`] gives UI field adapters a typed handle onto a single
//!   entry
//!
//! The store is framework-free and fully testable headlessly; see the
//! crate's integration tests.

pub mod client;
pub mod entry;
pub mod field;
pub mod remote;
pub mod store;
pub mod value;

pub use client::RestConfigClient;
pub use entry::SettingEntry;
pub use field::{BoolField, FieldBinding, FieldValue, IntField, TextField, UintField};
pub use remote::{ConfigApi, RemoteError};
pub use store::{ListenerId, SettingsStore};
pub use value::{SettingKind, SettingValue};
