pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] hondana_types::model::reading::InvalidStatus),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] garde::Report),

    #[error("User profile {0} was not stored")]
    ProfileNotPersisted(String),
}
