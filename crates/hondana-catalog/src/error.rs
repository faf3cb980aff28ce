pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog API error: {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// Network level failure, message is taken from underlying error as is
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),

    #[error("Invalid catalog base URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::InvalidResponse(e.to_string())
        } else {
            CatalogError::Transport(e)
        }
    }
}
