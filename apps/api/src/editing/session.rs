//! The editable report session.
//!
//! Holds the current report as an immutable `Arc<Report>` snapshot. Every edit
//! clones the snapshot, applies the change to the clone, swaps it in and
//! persists the new snapshot through the injected `SnapshotStore`.
//! Persistence is best-effort: store failures are logged, never returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::editing::ops::{self, EditError, ListItem, ReportList, ScalarField};
use crate::editing::store::SnapshotStore;
use crate::models::Report;

/// The on-store representation of the session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub extraction_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub report: Report,
}

/// One immutable state of the session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub extraction_id: Uuid,
    /// Incremented once per applied edit.
    pub revision: u64,
    pub report: Arc<Report>,
}

pub struct ReportSession {
    store: Arc<dyn SnapshotStore>,
    current: Option<SessionSnapshot>,
}

impl ReportSession {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&SessionSnapshot> {
        self.current.as_ref()
    }

    /// Loads whatever snapshot the store holds. Used at startup so a restart
    /// reproduces the user's edits.
    pub async fn restore(&mut self) -> Option<&SessionSnapshot> {
        if let Some(persisted) = self.load_persisted().await {
            info!(
                extraction_id = %persisted.extraction_id,
                saved_at = %persisted.saved_at,
                "Restored persisted report snapshot"
            );
            self.current = Some(SessionSnapshot {
                extraction_id: persisted.extraction_id,
                revision: 0,
                report: Arc::new(persisted.report),
            });
        }
        self.current.as_ref()
    }

    /// Starts a session for a freshly extracted report.
    ///
    /// A persisted snapshot of the same extraction wins over `fresh`; anything
    /// else is replaced by `fresh`, which is persisted immediately.
    pub async fn open(&mut self, extraction_id: Uuid, fresh: Report) -> SessionSnapshot {
        if let Some(persisted) = self.load_persisted().await {
            if persisted.extraction_id == extraction_id {
                debug!(%extraction_id, "Persisted edits take precedence over fresh report");
                let snapshot = SessionSnapshot {
                    extraction_id,
                    revision: 0,
                    report: Arc::new(persisted.report),
                };
                self.current = Some(snapshot.clone());
                return snapshot;
            }
        }

        let snapshot = SessionSnapshot {
            extraction_id,
            revision: 0,
            report: Arc::new(fresh),
        };
        self.persist(&snapshot).await;
        self.current = Some(snapshot.clone());
        snapshot
    }

    /// Discards the report and clears the persisted snapshot. The caller returns
    /// to the upload state.
    pub async fn reset(&mut self) {
        if let Some(snapshot) = self.current.take() {
            info!(extraction_id = %snapshot.extraction_id, "Report session reset");
        }
        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear persisted snapshot: {e}");
        }
    }

    pub async fn set_field(
        &mut self,
        field: ScalarField,
        value: String,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| {
            ops::set_field(r, field, value);
            Ok(())
        })
        .await
    }

    pub async fn upsert_list_item(
        &mut self,
        list: ReportList,
        index: usize,
        item: ListItem,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| ops::upsert_list_item(r, list, index, item)).await
    }

    pub async fn append_list_item(&mut self, item: ListItem) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| {
            ops::append_list_item(r, item);
            Ok(())
        })
        .await
    }

    pub async fn remove_list_item(
        &mut self,
        list: ReportList,
        index: usize,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| ops::remove_list_item(r, list, index)).await
    }

    pub async fn set_detail(
        &mut self,
        experience: usize,
        detail: usize,
        value: String,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| ops::set_detail(r, experience, detail, value)).await
    }

    pub async fn append_detail(
        &mut self,
        experience: usize,
        value: String,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| ops::append_detail(r, experience, value)).await
    }

    pub async fn remove_detail(
        &mut self,
        experience: usize,
        detail: usize,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| ops::remove_detail(r, experience, detail)).await
    }

    pub async fn set_answer(
        &mut self,
        category: usize,
        question: usize,
        answer: String,
    ) -> Result<SessionSnapshot, EditError> {
        self.apply(|r| ops::set_answer(r, category, question, answer)).await
    }

    async fn apply<F>(&mut self, edit: F) -> Result<SessionSnapshot, EditError>
    where
        F: FnOnce(&mut Report) -> Result<(), EditError>,
    {
        let current = self.current.as_ref().ok_or(EditError::NoReport)?;
        let mut draft = Report::clone(&current.report);
        edit(&mut draft)?;

        let next = SessionSnapshot {
            extraction_id: current.extraction_id,
            revision: current.revision + 1,
            report: Arc::new(draft),
        };
        self.persist(&next).await;
        self.current = Some(next.clone());
        Ok(next)
    }

    async fn persist(&self, snapshot: &SessionSnapshot) {
        let persisted = PersistedSnapshot {
            extraction_id: snapshot.extraction_id,
            saved_at: Utc::now(),
            report: Report::clone(&snapshot.report),
        };
        let serialized = match serde_json::to_string(&persisted) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize report snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(&serialized).await {
            warn!(revision = snapshot.revision, "Failed to persist report snapshot: {e}");
        }
    }

    /// Reads the store; unreadable or unparseable content counts as absent.
    async fn load_persisted(&self) -> Option<PersistedSnapshot> {
        let raw = match self.store.load().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read persisted snapshot: {e}");
                return None;
            }
        };
        match serde_json::from_str::<PersistedSnapshot>(&raw) {
            Ok(persisted) => Some(persisted),
            Err(e) => {
                warn!("Discarding unparseable persisted snapshot: {e}");
                None
            }
        }
    }
}
