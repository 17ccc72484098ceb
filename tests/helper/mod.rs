#![allow(dead_code)]

pub mod host;
pub mod release;

pub use host::{MemoryKeyValueStore, RecordingDownloadFacility, RecordingLauncher};
pub use release::{release_json, test_config};
