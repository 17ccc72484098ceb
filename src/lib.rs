//! Self-update core for applications distributed through GitHub releases
//!
//! - [`update`]: release checks, dismissal tracking, download and install hand-off
//! - [`host`]: desktop implementations of the storage, download and launcher capabilities
//! - [`config`]: static update configuration and data paths
//! - [`logging`]: tracing subscriber setup for embedding applications

pub mod config;
pub mod host;
pub mod logging;
pub mod update;
