use futures::TryStreamExt as _;
use hondana_types::{
    model::reading::InvalidStatus, Patch, ReadingStatus, MAX_PROGRESS,
};
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::PrimitiveDateTime;
use tracing::debug;

use crate::{composite_key, error::Result};

/// Reading progress of one book in user library
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserBook {
    pub user_id: String,
    pub book_id: String,
    pub status: ReadingStatus,
    pub progress: u8,
    pub started_at: Option<PrimitiveDateTime>,
    pub finished_at: Option<PrimitiveDateTime>,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserBookInt {
    user_id: String,
    book_id: String,
    status: String,
    progress: i64,
    started_at: Option<PrimitiveDateTime>,
    finished_at: Option<PrimitiveDateTime>,
    updated_at: PrimitiveDateTime,
}

impl TryFrom<UserBookInt> for UserBook {
    type Error = InvalidStatus;

    fn try_from(value: UserBookInt) -> Result<Self, Self::Error> {
        Ok(UserBook {
            status: value.status.parse()?,
            progress: value.progress.clamp(0, MAX_PROGRESS as i64) as u8,
            user_id: value.user_id,
            book_id: value.book_id,
            started_at: value.started_at,
            finished_at: value.finished_at,
            updated_at: value.updated_at,
        })
    }
}

/// Partial update of reading progress.
///
/// `status: Patch::Clear` removes the book from library, other fields are then ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub status: Patch<ReadingStatus>,
    pub progress: Option<u8>,
}

impl ProgressUpdate {
    pub fn progress(progress: u8) -> Self {
        ProgressUpdate {
            status: Patch::Keep,
            progress: Some(progress),
        }
    }

    pub fn status(status: ReadingStatus) -> Self {
        ProgressUpdate {
            status: Patch::Set(status),
            progress: None,
        }
    }

    pub fn remove() -> Self {
        ProgressUpdate {
            status: Patch::Clear,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }
}

// ?4 - status or NULL to keep, ?5 - progress or NULL to keep
// New record without status is created as reading
const UPSERT_PROGRESS: &str = concat!(
    "INSERT INTO user_books (id, user_id, book_id, status, progress, started_at, finished_at, updated_at) ",
    "VALUES (?1, ?2, ?3, COALESCE(?4, 'reading'), COALESCE(?5, 0), ",
    "CASE WHEN COALESCE(?4, 'reading') = 'reading' THEN ",
    now!(),
    " END, CASE WHEN ?4 = 'finished' THEN ",
    now!(),
    " END, ",
    now!(),
    ") ON CONFLICT(id) DO UPDATE SET ",
    "status = COALESCE(?4, status), ",
    "progress = COALESCE(?5, progress), ",
    "started_at = CASE WHEN ?4 = 'reading' THEN excluded.updated_at ELSE started_at END, ",
    "finished_at = CASE WHEN ?4 = 'finished' THEN excluded.updated_at ELSE finished_at END, ",
    "updated_at = excluded.updated_at"
);

const SELECT_USER_BOOK: &str = "SELECT user_id, book_id, status, progress, started_at, \
    finished_at, updated_at FROM user_books";

pub type UserBookRepository = UserBookRepositoryImpl<Pool<crate::ChosenDB>>;

#[derive(Debug, Clone)]
pub struct UserBookRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> UserBookRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn get(&self, user_id: &str, book_id: &str) -> Result<Option<UserBook>> {
        let record =
            sqlx::query_as::<_, UserBookInt>(&format!("{SELECT_USER_BOOK} WHERE id = ?"))
                .bind(composite_key(user_id, book_id))
                .fetch_optional(&self.executor)
                .await?;
        Ok(record.map(UserBook::try_from).transpose()?)
    }

    /// Merges update into stored record, unmentioned fields are preserved
    pub async fn update(
        &self,
        user_id: &str,
        book_id: &str,
        update: ProgressUpdate,
    ) -> Result<()> {
        let id = composite_key(user_id, book_id);
        let status = match update.status {
            Patch::Clear => {
                let res = sqlx::query("DELETE FROM user_books WHERE id = ?")
                    .bind(&id)
                    .execute(&self.executor)
                    .await?;
                debug!("Removed {id} from library, existed {}", res.rows_affected() > 0);
                return Ok(());
            }
            Patch::Set(status) => Some(status.as_str()),
            Patch::Keep => None,
        };
        let progress = update.progress.map(|p| p.min(MAX_PROGRESS) as i64);

        sqlx::query(UPSERT_PROGRESS)
            .bind(&id)
            .bind(user_id)
            .bind(book_id)
            .bind(status)
            .bind(progress)
            .execute(&self.executor)
            .await?;
        debug!("Updated reading progress {id}: status {status:?}, progress {progress:?}");
        Ok(())
    }

    /// Most recently updated first
    pub async fn list(
        &self,
        user_id: &str,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<UserBook>> {
        let records = sqlx::query_as::<_, UserBookInt>(&format!(
            "{SELECT_USER_BOOK} WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2) ORDER BY updated_at DESC, rowid DESC"
        ))
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;

        let books = records
            .into_iter()
            .map(UserBook::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }
}
