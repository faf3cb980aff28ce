use axum::extract::{FromRequestParts, Query};
use axum::response::{IntoResponse, Response};
use garde::{Report, Validate};
use http::request::Parts;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use crate::error::ApiError;
use crate::state::AppState;

/// Extracts inner value and validates it with garde
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Garde<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E: Display> Display for Garde<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> Garde<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

#[derive(Debug)]
pub enum ValidationRejection<V, E> {
    /// Extracted value did not pass validation
    Valid(V),
    /// Inner extractor failed
    Inner(E),
}

impl<V: Display, E: Display> Display for ValidationRejection<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationRejection::Valid(errors) => write!(f, "{errors}"),
            ValidationRejection::Inner(error) => write!(f, "{error}"),
        }
    }
}

impl<V: Error + 'static, E: Error + 'static> Error for ValidationRejection<V, E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ValidationRejection::Valid(ve) => Some(ve),
            ValidationRejection::Inner(e) => Some(e),
        }
    }
}

pub type GardeRejection<E> = ValidationRejection<Report, E>;

/// Message of the first failed rule, without field path
pub fn first_message(report: &Report) -> String {
    report
        .iter()
        .next()
        .map(|(_, error)| error.message().to_string())
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// Both cases are client errors, rendered same way as other API errors
impl<E: Display> IntoResponse for GardeRejection<E> {
    fn into_response(self) -> Response {
        let msg = match self {
            ValidationRejection::Valid(report) => first_message(&report),
            ValidationRejection::Inner(error) => error.to_string(),
        };
        ApiError::InvalidRequest(msg).into_response()
    }
}

impl<E> From<Report> for GardeRejection<E> {
    fn from(value: Report) -> Self {
        Self::Valid(value)
    }
}

impl<T> FromRequestParts<AppState> for Garde<Query<T>>
where
    T: Validate<Context = ()> + DeserializeOwned + Send,
{
    type Rejection = GardeRejection<String>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let inner = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| GardeRejection::Inner(e.body_text()))?;

        inner.deref().validate()?;
        Ok(Garde(inner))
    }
}
