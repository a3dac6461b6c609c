//! Single-writer session state store.
//!
//! All mutations go through `SessionStore::apply`, which runs against the latest
//! state inside `watch::Sender::send_modify`. Concurrent writers are serialized,
//! so keyed merges never lose a sibling's update, and subscribers see whole
//! snapshots only.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::models::job::{JobInput, ResultMap};
use crate::models::resume::UploadedFile;
use crate::session::registry::JobRegistry;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub resume: Option<UploadedFile>,
    pub jobs: JobRegistry,
    pub results: ResultMap,
    pub selected_job_id: Option<String>,
    pub in_progress: bool,
    /// Id of the batch that owns `results`; completions from any other batch are dropped.
    #[serde(skip)]
    pub batch_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_state(SessionState::default())
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    /// Applies `update` atomically to the latest state and notifies subscribers.
    pub fn apply<R>(&self, update: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut output = None;
        self.tx.send_modify(|state| output = Some(update(state)));
        output.expect("send_modify runs its closure exactly once")
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    // ── Job Registry ────────────────────────────────────────────────────────

    pub fn add_job(&self) -> JobInput {
        self.apply(|state| state.jobs.add().clone())
    }

    pub fn remove_job(&self, id: &str) -> bool {
        self.apply(|state| state.jobs.remove(id))
    }

    pub fn update_job_text(&self, id: &str, text: String) -> bool {
        self.apply(|state| state.jobs.update_text(id, text))
    }

    // ── Resume ──────────────────────────────────────────────────────────────

    /// Replaces the active resume. Only one may be active at a time.
    pub fn set_resume(&self, file: UploadedFile) {
        self.apply(|state| state.resume = Some(file));
    }

    pub fn clear_resume(&self) -> bool {
        self.apply(|state| state.resume.take().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            data: "JVBERi0=".to_string(),
            size_bytes: 5,
        }
    }

    #[test]
    fn test_registry_operations_go_through_store() {
        let store = SessionStore::new();
        let added = store.add_job();
        assert_eq!(store.snapshot().jobs.len(), 2);

        assert!(store.update_job_text(&added.id, "Backend Engineer".to_string()));
        assert_eq!(
            store.snapshot().jobs.get(&added.id).unwrap().text,
            "Backend Engineer"
        );

        assert!(store.remove_job(&added.id));
        assert!(!store.remove_job(&store.snapshot().jobs.jobs()[0].id));
        assert_eq!(store.snapshot().jobs.len(), 1);
    }

    #[test]
    fn test_second_upload_replaces_first() {
        let store = SessionStore::new();
        store.set_resume(pdf("old.pdf"));
        store.set_resume(pdf("new.pdf"));
        assert_eq!(store.snapshot().resume.unwrap().name, "new.pdf");
        assert!(store.clear_resume());
        assert!(!store.clear_resume());
    }

    #[test]
    fn test_snapshot_never_serializes_resume_bytes() {
        let store = SessionStore::new();
        store.set_resume(pdf("cv.pdf"));
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["resume"]["name"], "cv.pdf");
        assert!(json["resume"].get("data").is_none());
        assert_eq!(json["inProgress"], false);
        assert!(json.get("batchId").is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_updates() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        store.apply(|state| state.in_progress = true);
        rx.changed().await.unwrap();
        assert!(rx.borrow().in_progress);
    }
}
