//! Host capability fakes that record their calls

use std::collections::HashMap;
use std::sync::Mutex;

use release_updater::update::error::{DownloadError, LaunchError, StoreError};
use release_updater::update::fetcher::{
    DownloadFacility, DownloadRequest, InstallLauncher, LaunchRequest,
};
use release_updater::update::store::KeyValueStore;
use release_updater::update::types::DownloadJobHandle;
use reqwest::Url;

/// In-memory key-value store
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Download facility that records requests and resolves handles from a fixed table
#[derive(Default)]
pub struct RecordingDownloadFacility {
    pub requests: Mutex<Vec<DownloadRequest>>,
    pub completed: Mutex<HashMap<DownloadJobHandle, Url>>,
}

impl RecordingDownloadFacility {
    pub fn complete(&self, handle: DownloadJobHandle, uri: &str) {
        self.completed
            .lock()
            .unwrap()
            .insert(handle, Url::parse(uri).unwrap());
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl DownloadFacility for RecordingDownloadFacility {
    fn enqueue(&self, request: DownloadRequest) -> Result<DownloadJobHandle, DownloadError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        Ok(DownloadJobHandle(requests.len() as i64))
    }

    fn resolve_uri(&self, handle: DownloadJobHandle) -> Result<Option<Url>, DownloadError> {
        Ok(self.completed.lock().unwrap().get(&handle).cloned())
    }
}

/// Install launcher that records launches instead of opening anything
#[derive(Default)]
pub struct RecordingLauncher {
    pub launches: Mutex<Vec<LaunchRequest>>,
}

impl RecordingLauncher {
    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }
}

impl InstallLauncher for RecordingLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError> {
        self.launches.lock().unwrap().push(request.clone());
        Ok(())
    }
}
