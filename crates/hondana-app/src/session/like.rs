use hondana_dal::PreferenceStore;
use hondana_types::IdentityWatch;
use tokio::sync::watch;
use tracing::{debug, error};

use super::{
    error::{ControllerError, Result},
    identity::{current_uid, Activate, Generation},
    optimistic::{begin, MutationPhase, Optimistic},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeState {
    pub is_liked: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub phase: MutationPhase<bool>,
}

impl Optimistic for LikeState {
    type Snapshot = bool;

    fn phase_mut(&mut self) -> &mut MutationPhase<bool> {
        &mut self.phase
    }

    fn snapshot(&self) -> bool {
        self.is_liked
    }

    fn restore(&mut self, snapshot: bool) {
        self.is_liked = snapshot;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Like flag of one book for current user
pub struct LikeController<S> {
    store: S,
    identity: IdentityWatch,
    book_id: String,
    state: watch::Sender<LikeState>,
    generation: Generation,
}

impl<S: PreferenceStore> LikeController<S> {
    pub fn new(store: S, identity: IdentityWatch, book_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(LikeState::default());
        LikeController {
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

    pub fn state(&self) -> LikeState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LikeState> {
        self.state.subscribe()
    }

    /// Flips like flag immediately, reverts it if store refuses the change
    pub async fn toggle_like(&self) -> Result<()> {
        let uid = current_uid(&self.identity).ok_or(ControllerError::AuthRequired)?;
        let mut liked = false;
        let change = begin(&self.state, &self.generation, |s| {
            s.is_liked = !s.is_liked;
            liked = s.is_liked;
        })?;

        let result = if liked {
            self.store.add_like(&uid, &self.book_id).await
        } else {
            self.store.remove_like(&uid, &self.book_id).await
        };
        if let Err(e) = &result {
            error!("Failed to save like of {} for {uid}: {e}", self.book_id);
        }
        change.settle(result)
    }
}

impl<S: PreferenceStore> Activate for LikeController<S> {
    async fn activate(&self) {
        let generation = self.generation.next();
        let Some(uid) = current_uid(&self.identity) else {
            self.state.send_replace(LikeState::default());
            return;
        };
        self.state.send_replace(LikeState {
            is_loading: true,
            ..Default::default()
        });
        let result = self.store.is_book_liked(&uid, &self.book_id).await;
        if !self.generation.is_current(generation) {
            return;
        }
        match result {
            Ok(is_liked) => {
                debug!("Book {} liked by {uid}: {is_liked}", self.book_id);
                self.state.send_modify(|s| {
                    s.is_liked = is_liked;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                error!("Failed to check like of {}: {e}", self.book_id);
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.is_loading = false;
                });
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedBooksState {
    /// Most recently liked first
    pub liked_book_ids: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// All books liked by current user
pub struct LikedBooks<S> {
    store: S,
    identity: IdentityWatch,
    state: watch::Sender<LikedBooksState>,
    generation: Generation,
}

impl<S: PreferenceStore> LikedBooks<S> {
    pub fn new(store: S, identity: IdentityWatch) -> Self {
        let (state, _) = watch::channel(LikedBooksState::default());
        LikedBooks {
            store,
            identity,
            state,
            generation: Generation::default(),
        }
    }

    pub fn state(&self) -> LikedBooksState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LikedBooksState> {
        self.state.subscribe()
    }

    pub fn is_liked(&self, book_id: &str) -> bool {
        self.state
            .borrow()
            .liked_book_ids
            .iter()
            .any(|id| id == book_id)
    }

    pub async fn refetch(&self) {
        let generation = self.generation.next();
        let Some(uid) = current_uid(&self.identity) else {
            self.state.send_replace(LikedBooksState::default());
            return;
        };
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
        let result = self.store.get_liked_books(&uid).await;
        if !self.generation.is_current(generation) {
            return;
        }
        let state = match result {
            Ok(books) => LikedBooksState {
                liked_book_ids: books.into_iter().map(|b| b.book_id).collect(),
                ..Default::default()
            },
            Err(e) => {
                error!("Failed to load liked books of {uid}: {e}");
                LikedBooksState {
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        self.state.send_replace(state);
    }
}

impl<S: PreferenceStore> Activate for LikedBooks<S> {
    async fn activate(&self) {
        self.refetch().await
    }
}
