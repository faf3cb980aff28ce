use axum::{
    response::{IntoResponse, Response},
    Json,
};
use hondana_catalog::CatalogError;
use http::StatusCode;
use serde_json::json;
use tracing::{debug, error};

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Catalog API key not configured")]
    CatalogNotConfigured,
    #[error("{0} not found")]
    ResourceNotFound(String),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Catalog(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::CatalogNotConfigured | ApiError::Catalog(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected ({status}): {self}");
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
