use std::sync::Arc;

use hondana_types::ReadingStatus;

use crate::{
    Pool,
    error::Result,
    like::{LikeRepository, LikedBook},
    user::UserRepository,
    user_book::{ProgressUpdate, UserBook, UserBookRepository},
};

/// Per user likes and reading progress, as needed by session controllers
pub trait PreferenceStore {
    async fn add_like(&self, user_id: &str, book_id: &str) -> Result<()>;
    async fn remove_like(&self, user_id: &str, book_id: &str) -> Result<()>;
    async fn is_book_liked(&self, user_id: &str, book_id: &str) -> Result<bool>;
    async fn get_liked_books(&self, user_id: &str) -> Result<Vec<LikedBook>>;

    async fn get_reading_progress(&self, user_id: &str, book_id: &str)
    -> Result<Option<UserBook>>;
    async fn update_reading_progress(
        &self,
        user_id: &str,
        book_id: &str,
        update: ProgressUpdate,
    ) -> Result<()>;
    async fn get_user_books(
        &self,
        user_id: &str,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<UserBook>>;
}

#[derive(Debug, Clone)]
pub struct Preferences {
    likes: LikeRepository,
    books: UserBookRepository,
    users: UserRepository,
}

impl Preferences {
    pub fn new(pool: Pool) -> Self {
        Preferences {
            likes: LikeRepository::new(pool.clone()),
            books: UserBookRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }
}

impl PreferenceStore for Preferences {
    async fn add_like(&self, user_id: &str, book_id: &str) -> Result<()> {
        self.likes.add(user_id, book_id).await
    }

    async fn remove_like(&self, user_id: &str, book_id: &str) -> Result<()> {
        self.likes.remove(user_id, book_id).await
    }

    async fn is_book_liked(&self, user_id: &str, book_id: &str) -> Result<bool> {
        self.likes.is_liked(user_id, book_id).await
    }

    async fn get_liked_books(&self, user_id: &str) -> Result<Vec<LikedBook>> {
        self.likes.list(user_id).await
    }

    async fn get_reading_progress(
        &self,
        user_id: &str,
        book_id: &str,
    ) -> Result<Option<UserBook>> {
        self.books.get(user_id, book_id).await
    }

    async fn update_reading_progress(
        &self,
        user_id: &str,
        book_id: &str,
        update: ProgressUpdate,
    ) -> Result<()> {
        self.books.update(user_id, book_id, update).await
    }

    async fn get_user_books(
        &self,
        user_id: &str,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<UserBook>> {
        self.books.list(user_id, status).await
    }
}

macro_rules! forward_store {
    ($($wrapper:ty),+) => {
        $(
        impl<T: PreferenceStore> PreferenceStore for $wrapper {
            async fn add_like(&self, user_id: &str, book_id: &str) -> Result<()> {
                (**self).add_like(user_id, book_id).await
            }

            async fn remove_like(&self, user_id: &str, book_id: &str) -> Result<()> {
                (**self).remove_like(user_id, book_id).await
            }

            async fn is_book_liked(&self, user_id: &str, book_id: &str) -> Result<bool> {
                (**self).is_book_liked(user_id, book_id).await
            }

            async fn get_liked_books(&self, user_id: &str) -> Result<Vec<LikedBook>> {
                (**self).get_liked_books(user_id).await
            }

            async fn get_reading_progress(
                &self,
                user_id: &str,
                book_id: &str,
            ) -> Result<Option<UserBook>> {
                (**self).get_reading_progress(user_id, book_id).await
            }

            async fn update_reading_progress(
                &self,
                user_id: &str,
                book_id: &str,
                update: ProgressUpdate,
            ) -> Result<()> {
                (**self).update_reading_progress(user_id, book_id, update).await
            }

            async fn get_user_books(
                &self,
                user_id: &str,
                status: Option<ReadingStatus>,
            ) -> Result<Vec<UserBook>> {
                (**self).get_user_books(user_id, status).await
            }
        }
        )+
    };
}

forward_store!(&T, Arc<T>);
