//! Self-update core
//!
//! Detects whether a newer release exists, decides whether to surface it,
//! and hands the artifact download and installation off to host capabilities.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Release   │────▶│   Checker   │◀────│  Dismissal  │
//! │   Client    │     │  (decide)   │     │    Store    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Use cases  │────▶│  Artifact   │
//!                     │  (Updater)  │     │  Fetcher    │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`comparator`]: lenient multi-segment version comparison
//! - [`release`]: release client trait and descriptor mapping
//! - [`github`]: GitHub Releases API client
//! - [`store`]: key-value store trait and dismissed-version access
//! - [`checker`]: availability decision
//! - [`fetcher`]: download/install capability traits and the artifact fetcher
//! - [`usecases`]: orchestration use cases and the [`usecases::Updater`] facade
//! - [`error`]: error types for remote, storage, download and launch failures
//! - [`types`]: domain records shared across the subsystem

pub mod checker;
pub mod comparator;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod release;
pub mod store;
pub mod types;
pub mod usecases;
