use hondana_dal::{PreferenceStore, UserBook};
use hondana_types::{IdentityWatch, ReadingStatus};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error};

use super::identity::{current_uid, Activate, Generation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryCounts {
    pub total: usize,
    pub reading: usize,
    pub finished: usize,
    pub want_to_read: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryState {
    /// Most recently updated first, same order is kept in derived lists
    pub books: Vec<UserBook>,
    pub reading: Vec<UserBook>,
    pub finished: Vec<UserBook>,
    pub want_to_read: Vec<UserBook>,
    pub counts: LibraryCounts,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LibraryState {
    pub fn from_books(books: Vec<UserBook>) -> Self {
        let with_status = |status: ReadingStatus| {
            books
                .iter()
                .filter(|b| b.status == status)
                .cloned()
                .collect::<Vec<_>>()
        };
        let reading = with_status(ReadingStatus::Reading);
        let finished = with_status(ReadingStatus::Finished);
        let want_to_read = with_status(ReadingStatus::WantToRead);
        let counts = LibraryCounts {
            total: books.len(),
            reading: reading.len(),
            finished: finished.len(),
            want_to_read: want_to_read.len(),
        };
        LibraryState {
            books,
            reading,
            finished,
            want_to_read,
            counts,
            is_loading: false,
            error: None,
        }
    }
}

/// All books in library of current user
pub struct Library<S> {
    store: S,
    identity: IdentityWatch,
    state: watch::Sender<LibraryState>,
    generation: Generation,
}

impl<S: PreferenceStore> Library<S> {
    pub fn new(store: S, identity: IdentityWatch) -> Self {
        let (state, _) = watch::channel(LibraryState::default());
        Library {
            store,
            identity,
            state,
            generation: Generation::default(),
        }
    }

    pub fn state(&self) -> LibraryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LibraryState> {
        self.state.subscribe()
    }

    pub async fn refetch(&self) {
        let generation = self.generation.next();
        let Some(uid) = current_uid(&self.identity) else {
            self.state.send_replace(LibraryState::default());
            return;
        };
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
        let result = self.store.get_user_books(&uid, None).await;
        if !self.generation.is_current(generation) {
            return;
        }
        let state = match result {
            Ok(books) => {
                debug!("Library of {uid} has {} books", books.len());
                LibraryState::from_books(books)
            }
            Err(e) => {
                error!("Failed to load library of {uid}: {e}");
                LibraryState {
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        self.state.send_replace(state);
    }
}

impl<S: PreferenceStore> Activate for Library<S> {
    async fn activate(&self) {
        self.refetch().await
    }
}
