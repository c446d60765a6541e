#![forbid(unsafe_code)]

//! `localStorage` backing for the notes store seam.

use softnav_core::notes::KeyValueStore;
use web_sys::Storage;

use super::dom;

pub(crate) struct BrowserStore {
    storage: Storage,
}

impl BrowserStore {
    /// `None` when the browser denies storage access (private mode, iframe
    /// sandboxing).
    pub(crate) fn new() -> Option<Self> {
        let storage = dom::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            log::warn!("storage write for {key} failed: {err:?}");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            log::warn!("storage removal for {key} failed: {err:?}");
        }
    }
}
