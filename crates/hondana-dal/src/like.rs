use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::PrimitiveDateTime;
use tracing::debug;

use crate::{composite_key, error::Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LikedBook {
    pub user_id: String,
    pub book_id: String,
    pub liked_at: PrimitiveDateTime,
}

pub type LikeRepository = LikeRepositoryImpl<Pool<crate::ChosenDB>>;

#[derive(Debug, Clone)]
pub struct LikeRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> LikeRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Liking again only refreshes timestamp
    pub async fn add(&self, user_id: &str, book_id: &str) -> Result<()> {
        let id = composite_key(user_id, book_id);
        sqlx::query(concat!(
            "INSERT INTO likes (id, user_id, book_id, liked_at) VALUES (?, ?, ?, ",
            now!(),
            ") ON CONFLICT(id) DO UPDATE SET liked_at = excluded.liked_at"
        ))
        .bind(&id)
        .bind(user_id)
        .bind(book_id)
        .execute(&self.executor)
        .await?;
        debug!("Added like {id}");
        Ok(())
    }

    /// Removing not existing like is not an error
    pub async fn remove(&self, user_id: &str, book_id: &str) -> Result<()> {
        let id = composite_key(user_id, book_id);
        let res = sqlx::query("DELETE FROM likes WHERE id = ?")
            .bind(&id)
            .execute(&self.executor)
            .await?;
        debug!("Removed like {id}, existed {}", res.rows_affected() > 0);
        Ok(())
    }

    pub async fn is_liked(&self, user_id: &str, book_id: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, String>("SELECT id FROM likes WHERE id = ?")
            .bind(composite_key(user_id, book_id))
            .fetch_optional(&self.executor)
            .await?;
        Ok(found.is_some())
    }

    /// Most recently liked first
    pub async fn list(&self, user_id: &str) -> Result<Vec<LikedBook>> {
        let records = sqlx::query_as::<_, LikedBook>(
            "SELECT user_id, book_id, liked_at FROM likes WHERE user_id = ? ORDER BY liked_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }
}
