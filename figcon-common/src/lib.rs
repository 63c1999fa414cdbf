//! # FigCon Common Library
//!
//! Shared code for the figurine console, including:
//! - Error types
//! - Notification types and the in-process notification bus
//! - Translation catalog
//! - Console configuration loading
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod notify;

pub use error::{Error, Result};
