#![allow(async_fn_in_trait)]

/// Store assigned timestamp, millisecond precision keeps ordering of quick successive writes
macro_rules! now {
    () => {
        "strftime('%Y-%m-%d %H:%M:%f', 'now')"
    };
}

pub mod error;
pub mod like;
pub mod store;
pub mod user;
pub mod user_book;

pub use error::Error;
pub use sqlx::Error as SqlxError;
pub use like::LikedBook;
pub use store::{PreferenceStore, Preferences};
pub use user::{CreateUser, UpdateUser, UserProfile};
pub use user_book::{ProgressUpdate, UserBook};

use sqlx::sqlite::SqlitePoolOptions;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

/// Document key of per user book records - likes and reading progress
pub fn composite_key(user_id: &str, book_id: &str) -> String {
    format!("{user_id}_{book_id}")
}

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
