use std::sync::Arc;

use axum::extract::FromRequestParts;
use hondana_catalog::{CatalogClient, CatalogConfig};
use http::request::Parts;
use hondana_types::config::CatalogArgs;
use tracing::warn;

use crate::error::{ApiError, Result};

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    /// Missing catalog client is not fatal, catalog endpoints then respond with error
    pub fn new(catalog: Option<CatalogClient>) -> Self {
        AppState {
            state: Arc::new(AppStateInner { catalog }),
        }
    }

    pub fn from_args(args: &CatalogArgs) -> Result<Self> {
        let catalog = match CatalogConfig::from_args(args) {
            Some(config) => Some(CatalogClient::new(config)?),
            None => {
                warn!("Catalog API key is not configured, book search will not be available");
                None
            }
        };
        Ok(AppState::new(catalog))
    }

    pub fn catalog(&self) -> Result<&CatalogClient, ApiError> {
        self.state
            .catalog
            .as_ref()
            .ok_or(ApiError::CatalogNotConfigured)
    }
}

struct AppStateInner {
    catalog: Option<CatalogClient>,
}

/// Catalog client of configured deployment.
///
/// Put it before other extractors, so missing API key is reported before request is checked.
pub struct Catalog(pub CatalogClient);

impl FromRequestParts<AppState> for Catalog {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.catalog().cloned().map(Catalog)
    }
}
