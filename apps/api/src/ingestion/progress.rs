use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use uuid::Uuid;

/// Presentational upload state: percentage progress keyed by filename and the
/// set of files currently in the extract/parse stage. Scoped per user, reset
/// to empty after each batch completes.
#[derive(Default)]
pub struct UploadTracker {
    inner: Mutex<HashMap<Uuid, UserUploads>>,
}

#[derive(Debug, Default, Clone)]
struct UserUploads {
    progress: BTreeMap<String, u8>,
    processing: BTreeSet<String>,
}

/// Point-in-time view returned by the progress endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSnapshot {
    pub progress: BTreeMap<String, u8>,
    pub processing: Vec<String>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_progress(&self, user_id: Uuid, file_name: &str, percent: u8) {
        let mut inner = self.inner.lock().expect("upload tracker poisoned");
        inner
            .entry(user_id)
            .or_default()
            .progress
            .insert(file_name.to_string(), percent.min(100));
    }

    pub fn begin_processing(&self, user_id: Uuid, file_name: &str) {
        let mut inner = self.inner.lock().expect("upload tracker poisoned");
        inner
            .entry(user_id)
            .or_default()
            .processing
            .insert(file_name.to_string());
    }

    pub fn end_processing(&self, user_id: Uuid, file_name: &str) {
        let mut inner = self.inner.lock().expect("upload tracker poisoned");
        if let Some(state) = inner.get_mut(&user_id) {
            state.processing.remove(file_name);
        }
    }

    pub fn snapshot(&self, user_id: Uuid) -> UploadSnapshot {
        let inner = self.inner.lock().expect("upload tracker poisoned");
        let state = inner.get(&user_id).cloned().unwrap_or_default();
        UploadSnapshot {
            progress: state.progress,
            processing: state.processing.into_iter().collect(),
        }
    }

    /// Drops all state for a user once their batch is done.
    pub fn clear(&self, user_id: Uuid) {
        let mut inner = self.inner.lock().expect("upload tracker poisoned");
        inner.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_keyed_by_filename() {
        let tracker = UploadTracker::new();
        let user = Uuid::new_v4();
        tracker.set_progress(user, "a.pdf", 40);
        tracker.set_progress(user, "b.pdf", 90);
        tracker.set_progress(user, "a.pdf", 60);

        let snap = tracker.snapshot(user);
        assert_eq!(snap.progress.get("a.pdf"), Some(&60));
        assert_eq!(snap.progress.get("b.pdf"), Some(&90));
    }

    #[test]
    fn test_progress_caps_at_100() {
        let tracker = UploadTracker::new();
        let user = Uuid::new_v4();
        tracker.set_progress(user, "a.pdf", 250);
        assert_eq!(tracker.snapshot(user).progress.get("a.pdf"), Some(&100));
    }

    #[test]
    fn test_processing_set_tracks_membership() {
        let tracker = UploadTracker::new();
        let user = Uuid::new_v4();
        tracker.begin_processing(user, "a.pdf");
        assert_eq!(tracker.snapshot(user).processing, vec!["a.pdf"]);
        tracker.end_processing(user, "a.pdf");
        assert!(tracker.snapshot(user).processing.is_empty());
    }

    #[test]
    fn test_users_are_isolated() {
        let tracker = UploadTracker::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        tracker.set_progress(alice, "a.pdf", 10);
        assert!(tracker.snapshot(bob).progress.is_empty());
    }

    #[test]
    fn test_clear_resets_user_state() {
        let tracker = UploadTracker::new();
        let user = Uuid::new_v4();
        tracker.set_progress(user, "a.pdf", 100);
        tracker.begin_processing(user, "a.pdf");
        tracker.clear(user);

        let snap = tracker.snapshot(user);
        assert!(snap.progress.is_empty());
        assert!(snap.processing.is_empty());
    }
}
