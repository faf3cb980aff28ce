use garde::Validate;
use hondana_types::{
    Patch,
    locale::{DEFAULT_COUNTRY, DEFAULT_LANGUAGE},
};
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::PrimitiveDateTime;
use tracing::{debug, error};

use crate::{Error, error::Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub country: String,
    pub language: String,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct CreateUser {
    #[garde(length(min = 1, max = 128))]
    pub uid: String,
    #[garde(length(min = 3, max = 255))]
    pub email: Option<String>,
    #[garde(length(max = 255))]
    pub display_name: Option<String>,
    #[garde(length(max = 2048))]
    pub photo_url: Option<String>,
    #[garde(length(min = 2, max = 2))]
    pub country: Option<String>,
    #[garde(length(min = 2, max = 8))]
    pub language: Option<String>,
}

impl CreateUser {
    pub fn new(uid: impl Into<String>) -> Self {
        CreateUser {
            uid: uid.into(),
            ..Default::default()
        }
    }
}

impl From<&hondana_types::AuthUser> for CreateUser {
    fn from(user: &hondana_types::AuthUser) -> Self {
        CreateUser {
            uid: user.uid.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            country: None,
            language: None,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateUser {
    #[garde(skip)]
    pub email: Patch<String>,
    #[garde(skip)]
    pub display_name: Patch<String>,
    #[garde(skip)]
    pub photo_url: Patch<String>,
    #[garde(length(min = 2, max = 2))]
    pub country: Option<String>,
    #[garde(length(min = 2, max = 8))]
    pub language: Option<String>,
}

// Patch is bound as pair (keep flag, new value)
fn patch_params(patch: Patch<String>) -> (bool, Option<String>) {
    match patch {
        Patch::Keep => (true, None),
        Patch::Set(v) => (false, Some(v)),
        Patch::Clear => (false, None),
    }
}

const SELECT_USER: &str =
    "SELECT uid, email, display_name, photo_url, country, language, created_at, updated_at FROM users";

pub type UserRepository = UserRepositoryImpl<Pool<crate::ChosenDB>>;

#[derive(Debug, Clone)]
pub struct UserRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> UserRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
        let user = sqlx::query_as::<_, UserProfile>(&format!("{SELECT_USER} WHERE uid = ?"))
            .bind(uid)
            .fetch_optional(&self.executor)
            .await?;
        Ok(user)
    }

    /// Existing profile is left untouched
    pub async fn create(&self, payload: CreateUser) -> Result<()> {
        payload.validate()?;
        let res = sqlx::query(concat!(
            "INSERT INTO users (uid, email, display_name, photo_url, country, language, created_at, updated_at) ",
            "VALUES (?, ?, ?, ?, ?, ?, ",
            now!(),
            ", ",
            now!(),
            ") ON CONFLICT(uid) DO NOTHING"
        ))
        .bind(&payload.uid)
        .bind(payload.email)
        .bind(payload.display_name)
        .bind(payload.photo_url)
        .bind(payload.country.as_deref().unwrap_or(DEFAULT_COUNTRY))
        .bind(payload.language.as_deref().unwrap_or(DEFAULT_LANGUAGE))
        .execute(&self.executor)
        .await?;
        debug!(
            "Create profile {}, inserted {}",
            payload.uid,
            res.rows_affected() > 0
        );
        Ok(())
    }

    pub async fn update(&self, uid: &str, payload: UpdateUser) -> Result<UserProfile> {
        payload.validate()?;
        let (keep_email, email) = patch_params(payload.email);
        let (keep_name, display_name) = patch_params(payload.display_name);
        let (keep_photo, photo_url) = patch_params(payload.photo_url);
        let res = sqlx::query(concat!(
            "UPDATE users SET ",
            "email = CASE WHEN ?2 THEN email ELSE ?3 END, ",
            "display_name = CASE WHEN ?4 THEN display_name ELSE ?5 END, ",
            "photo_url = CASE WHEN ?6 THEN photo_url ELSE ?7 END, ",
            "country = COALESCE(?8, country), ",
            "language = COALESCE(?9, language), ",
            "updated_at = ",
            now!(),
            " WHERE uid = ?1"
        ))
        .bind(uid)
        .bind(keep_email)
        .bind(email)
        .bind(keep_name)
        .bind(display_name)
        .bind(keep_photo)
        .bind(photo_url)
        .bind(payload.country)
        .bind(payload.language)
        .execute(&self.executor)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::RecordNotFound(format!("User {uid}")));
        }
        self.get(uid)
            .await?
            .ok_or_else(|| Error::RecordNotFound(format!("User {uid}")))
    }

    /// Profile as stored, created with defaults on first call
    pub async fn get_or_create(&self, payload: CreateUser) -> Result<UserProfile> {
        if let Some(user) = self.get(&payload.uid).await? {
            return Ok(user);
        }
        let uid = payload.uid.clone();
        self.create(payload).await?;
        match self.get(&uid).await? {
            Some(user) => {
                debug!("Created new profile {uid}");
                Ok(user)
            }
            None => {
                error!("Profile {uid} not found after creation");
                Err(Error::ProfileNotPersisted(uid))
            }
        }
    }
}
