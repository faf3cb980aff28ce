//! UI facing controllers.
//!
//! Each controller keeps its observable state in a [`tokio::sync::watch`] channel,
//! so front ends can either poll [`state`](search::SearchSession::state) snapshots
//! or subscribe to changes.

pub mod error;
pub mod identity;
pub mod library;
pub mod like;
pub mod optimistic;
pub mod progress;
pub mod search;

pub use error::{ControllerError, Result};
pub use identity::{follow_identity, Activate};
pub use library::{Library, LibraryCounts, LibraryState};
pub use like::{LikeController, LikeState, LikedBooks, LikedBooksState};
pub use optimistic::MutationPhase;
pub use progress::{ProgressState, ReadingProgressController};
pub use search::{SearchOptions, SearchSession, SearchState};
