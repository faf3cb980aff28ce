use hondana_catalog::CatalogError;

pub type Result<T, E = ControllerError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("User must be signed in")]
    AuthRequired,
    #[error("Previous change is still being saved")]
    MutationPending,
    #[error("{0}")]
    Store(#[from] hondana_dal::Error),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
}
