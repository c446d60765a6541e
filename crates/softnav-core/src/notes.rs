#![forbid(unsafe_code)]

//! Info-page notes, mirrored into a client-local key-value store.
//!
//! Two entries: the about text autosaves on every edit, the project summary
//! saves on an explicit action and can be cleared, which removes the key
//! entirely rather than storing an empty string. Single writer, last write
//! wins; there is no server round-trip.

use core::time::Duration;

/// Route prefix of the info page.
pub const INFO_PATH: &str = "/info";

/// Storage key of the about text.
pub const ABOUT_KEY: &str = "ai_chat_about_me";
/// Storage key of the project summary.
pub const PROJECT_KEY: &str = "ai_chat_project_summary";

/// Save-button caption at rest.
pub const SAVE_LABEL: &str = "Save";
/// Save-button caption right after a save.
pub const SAVED_LABEL: &str = "Saved";
/// How long the saved caption stays before reverting.
pub const SAVED_REVERT_AFTER: Duration = Duration::from_millis(1200);

/// Minimal key-value store seam; the web layer backs it with `localStorage`,
/// tests with a map.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// The info page's two note fields over a store.
#[derive(Debug)]
pub struct NotesPanel<S> {
    store: S,
}

impl<S: KeyValueStore> NotesPanel<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn about(&self) -> Option<String> {
        self.store.get(ABOUT_KEY)
    }

    /// Autosaved on every edit, including edits down to the empty string.
    pub fn autosave_about(&mut self, text: &str) {
        self.store.set(ABOUT_KEY, text);
    }

    #[must_use]
    pub fn project(&self) -> Option<String> {
        self.store.get(PROJECT_KEY)
    }

    pub fn save_project(&mut self, text: &str) {
        self.store.set(PROJECT_KEY, text);
    }

    /// Removes the stored value entirely.
    pub fn clear_project(&mut self) {
        self.store.remove(PROJECT_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(HashMap<String, String>);

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
        fn set(&mut self, key: &str, value: &str) {
            self.0.insert(key.to_string(), value.to_string());
        }
        fn remove(&mut self, key: &str) {
            self.0.remove(key);
        }
    }

    #[test]
    fn saved_notes_survive_a_reload() {
        let mut panel = NotesPanel::new(MemoryStore::default());
        panel.autosave_about("I build ovens");
        panel.save_project("rebuild the bakery site");

        // A reload constructs a fresh panel over the same backing store.
        let NotesPanel { store } = panel;
        let panel = NotesPanel::new(store);
        assert_eq!(panel.about().as_deref(), Some("I build ovens"));
        assert_eq!(panel.project().as_deref(), Some("rebuild the bakery site"));
    }

    #[test]
    fn clearing_removes_the_key_entirely() {
        let mut panel = NotesPanel::new(MemoryStore::default());
        panel.save_project("temp");
        panel.clear_project();
        assert_eq!(panel.project(), None);
    }

    #[test]
    fn about_autosave_keeps_the_latest_edit() {
        let mut panel = NotesPanel::new(MemoryStore::default());
        panel.autosave_about("draft");
        panel.autosave_about("");
        assert_eq!(panel.about().as_deref(), Some(""));
    }
}
