pub mod config;
pub mod identity;
pub mod locale;
pub mod model;
pub mod patch;

pub use identity::{AuthUser, Identity, IdentityWatch};
pub use model::book::Book;
pub use model::reading::{clamp_progress, ReadingStatus, MAX_PROGRESS};
pub use patch::Patch;
