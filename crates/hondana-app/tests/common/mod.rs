#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use hondana_catalog::{CatalogError, CatalogSource, SearchPage, SearchParams};
use hondana_dal::{
    LikedBook, PreferenceStore, Preferences, ProgressUpdate, SqlxError, UserBook,
};
use hondana_types::{Book, ReadingStatus};
use tokio::sync::Notify;

pub fn book(id: impl Into<String>) -> Book {
    let id = id.into();
    Book {
        title: format!("Title of {id}"),
        id,
        subtitle: None,
        authors: vec![],
        publisher: None,
        published_date: None,
        description: None,
        page_count: None,
        categories: vec![],
        average_rating: None,
        ratings_count: None,
        thumbnail: None,
        language: None,
        preview_link: None,
        info_link: None,
        isbn: None,
        saleability: None,
        is_ebook: None,
        country: None,
    }
}

/// Catalog with `total` generated books for every query
pub struct FakeCatalog {
    pub total: u64,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub requests: Mutex<Vec<SearchParams>>,
    gated: AtomicBool,
    gate: Notify,
}

impl FakeCatalog {
    pub fn new(total: u64) -> Self {
        FakeCatalog {
            total,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            requests: Mutex::new(vec![]),
            gated: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }

    /// Following searches wait for [`FakeCatalog::release`]
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl CatalogSource for FakeCatalog {
    async fn search(&self, params: &SearchParams) -> hondana_catalog::Result<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(params.clone());
        // let other futures run while request is "in flight"
        tokio::task::yield_now().await;
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CatalogError::Status {
                status: 503,
                status_text: "Service Unavailable".into(),
            });
        }
        let start = params.start_index as u64;
        let end = (start + params.max_results as u64).min(self.total);
        let books = (start..end)
            .map(|i| book(format!("{}-{i}", params.query)))
            .collect();
        Ok(SearchPage::new(books, self.total, params.start_index))
    }

    async fn get_by_id(&self, id: &str, _country: Option<&str>) -> hondana_catalog::Result<Book> {
        Ok(book(id))
    }
}

pub async fn init_db() -> hondana_dal::Pool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    hondana_dal::migrate(&pool).await.unwrap();
    pool
}

/// Real store which can be switched to failing or held until released
pub struct TestStore {
    inner: Preferences,
    fail: AtomicBool,
    gated: AtomicBool,
    gate: Notify,
    pub writes: Mutex<Vec<ProgressUpdate>>,
    pub reads: AtomicUsize,
}

impl TestStore {
    pub async fn new() -> Self {
        TestStore {
            inner: Preferences::new(init_db().await),
            fail: AtomicBool::new(false),
            gated: AtomicBool::new(false),
            gate: Notify::new(),
            writes: Mutex::new(vec![]),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Following calls wait for [`TestStore::release`]
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn writes(&self) -> Vec<ProgressUpdate> {
        self.writes.lock().unwrap().clone()
    }

    async fn pass(&self) -> hondana_dal::error::Result<()> {
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SqlxError::PoolTimedOut.into());
        }
        Ok(())
    }
}

impl PreferenceStore for TestStore {
    async fn add_like(&self, user_id: &str, book_id: &str) -> hondana_dal::error::Result<()> {
        self.pass().await?;
        self.inner.add_like(user_id, book_id).await
    }

    async fn remove_like(&self, user_id: &str, book_id: &str) -> hondana_dal::error::Result<()> {
        self.pass().await?;
        self.inner.remove_like(user_id, book_id).await
    }

    async fn is_book_liked(
        &self,
        user_id: &str,
        book_id: &str,
    ) -> hondana_dal::error::Result<bool> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.pass().await?;
        self.inner.is_book_liked(user_id, book_id).await
    }

    async fn get_liked_books(
        &self,
        user_id: &str,
    ) -> hondana_dal::error::Result<Vec<LikedBook>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.pass().await?;
        self.inner.get_liked_books(user_id).await
    }

    async fn get_reading_progress(
        &self,
        user_id: &str,
        book_id: &str,
    ) -> hondana_dal::error::Result<Option<UserBook>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.pass().await?;
        self.inner.get_reading_progress(user_id, book_id).await
    }

    async fn update_reading_progress(
        &self,
        user_id: &str,
        book_id: &str,
        update: ProgressUpdate,
    ) -> hondana_dal::error::Result<()> {
        self.writes.lock().unwrap().push(update.clone());
        self.pass().await?;
        self.inner
            .update_reading_progress(user_id, book_id, update)
            .await
    }

    async fn get_user_books(
        &self,
        user_id: &str,
        status: Option<ReadingStatus>,
    ) -> hondana_dal::error::Result<Vec<UserBook>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.pass().await?;
        self.inner.get_user_books(user_id, status).await
    }
}
