use hondana_dal::{PreferenceStore, ProgressUpdate};
use hondana_types::{clamp_progress, IdentityWatch, ReadingStatus, MAX_PROGRESS};
use tokio::sync::watch;
use tracing::{debug, error};

use super::{
    error::{ControllerError, Result},
    identity::{current_uid, Activate, Generation},
    optimistic::{begin, MutationPhase, Optimistic},
};

/// Local values restored on failed change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub status: Option<ReadingStatus>,
    pub progress: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// `None` when book is not in library
    pub status: Option<ReadingStatus>,
    pub progress: u8,
    pub is_loading: bool,
    pub error: Option<String>,
    pub phase: MutationPhase<ProgressSnapshot>,
}

impl Optimistic for ProgressState {
    type Snapshot = ProgressSnapshot;

    fn phase_mut(&mut self) -> &mut MutationPhase<ProgressSnapshot> {
        &mut self.phase
    }

    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            status: self.status,
            progress: self.progress,
        }
    }

    fn restore(&mut self, snapshot: ProgressSnapshot) {
        self.status = snapshot.status;
        self.progress = snapshot.progress;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Reading status and progress of one book for current user
pub struct ReadingProgressController<S> {
    store: S,
    identity: IdentityWatch,
    book_id: String,
    state: watch::Sender<ProgressState>,
    generation: Generation,
}

impl<S: PreferenceStore> ReadingProgressController<S> {
    pub fn new(store: S, identity: IdentityWatch, book_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ProgressState::default());
        ReadingProgressController {
            store,
            identity,
            book_id: book_id.into(),
            state,
            generation: Generation::default(),
        }
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn state(&self) -> ProgressState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.state.subscribe()
    }

    async fn mutate(
        &self,
        apply: impl FnOnce(&mut ProgressState),
        update: ProgressUpdate,
    ) -> Result<()> {
        let uid = current_uid(&self.identity).ok_or(ControllerError::AuthRequired)?;
        let change = begin(&self.state, &self.generation, apply)?;
        debug!("Saving {update:?} of {} for {uid}", self.book_id);
        let result = self
            .store
            .update_reading_progress(&uid, &self.book_id, update)
            .await;
        if let Err(e) = &result {
            error!("Failed to save progress of {} for {uid}: {e}", self.book_id);
        }
        change.settle(result)
    }

    /// Value is clamped to 0..=100
    pub async fn update_progress(&self, progress: i64) -> Result<()> {
        let progress = clamp_progress(progress);
        self.mutate(
            |s| {
                s.progress = progress;
                // store creates missing record as reading
                s.status.get_or_insert(ReadingStatus::Reading);
            },
            ProgressUpdate::progress(progress),
        )
        .await
    }

    /// Finished status also completes progress, in the same write
    pub async fn update_status(&self, status: ReadingStatus) -> Result<()> {
        let mut update = ProgressUpdate::status(status);
        if status == ReadingStatus::Finished {
            update = update.with_progress(MAX_PROGRESS);
        }
        self.mutate(
            |s| {
                s.status = Some(status);
                if status == ReadingStatus::Finished {
                    s.progress = MAX_PROGRESS;
                }
            },
            update,
        )
        .await
    }

    pub async fn remove_from_library(&self) -> Result<()> {
        self.mutate(
            |s| {
                s.status = None;
                s.progress = 0;
            },
            ProgressUpdate::remove(),
        )
        .await
    }
}

impl<S: PreferenceStore> Activate for ReadingProgressController<S> {
    async fn activate(&self) {
        let generation = self.generation.next();
        let Some(uid) = current_uid(&self.identity) else {
            self.state.send_replace(ProgressState::default());
            return;
        };
        self.state.send_replace(ProgressState {
            is_loading: true,
            ..Default::default()
        });
        let result = self.store.get_reading_progress(&uid, &self.book_id).await;
        if !self.generation.is_current(generation) {
            return;
        }
        match result {
            Ok(record) => self.state.send_modify(|s| {
                s.status = record.as_ref().map(|r| r.status);
                s.progress = record.map(|r| r.progress).unwrap_or(0);
                s.is_loading = false;
            }),
            Err(e) => {
                error!("Failed to load progress of {}: {e}", self.book_id);
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.is_loading = false;
                });
            }
        }
    }
}
