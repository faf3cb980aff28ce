use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use garde::Validate;
use hondana_catalog::{OrderBy, SearchParams, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};
use http::header;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    state::{AppState, Catalog},
    validate::Garde,
};

const SEARCH_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";
const BOOK_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=7200";

fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("Query parameter \"q\" is required"))
    } else {
        Ok(())
    }
}

fn page_size(value: &Option<u32>, _ctx: &()) -> garde::Result {
    match value {
        Some(size) if !(1..=MAX_RESULTS_LIMIT).contains(size) => {
            let msg = format!("maxResults must be between 1 and {MAX_RESULTS_LIMIT}");
            Err(garde::Error::new(msg))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    #[garde(custom(not_blank))]
    pub q: String,
    #[garde(skip)]
    pub start_index: Option<u32>,
    #[garde(custom(page_size))]
    pub max_results: Option<u32>,
    #[garde(skip)]
    pub order_by: Option<OrderBy>,
    #[garde(length(max = 8))]
    pub lang_restrict: Option<String>,
    #[garde(length(max = 2))]
    pub country: Option<String>,
}

impl From<SearchQuery> for SearchParams {
    fn from(query: SearchQuery) -> Self {
        SearchParams {
            query: query.q.trim().to_string(),
            start_index: query.start_index.unwrap_or(0),
            max_results: query.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            order_by: query.order_by,
            lang_restrict: query.lang_restrict,
            country: query.country,
            print_type: None,
        }
    }
}

/// Forwards search to catalog, response is catalog JSON as is
pub async fn search(
    Catalog(catalog): Catalog,
    Garde(Query(query)): Garde<Query<SearchQuery>>,
) -> ApiResult<impl IntoResponse> {
    let params = SearchParams::from(query);
    debug!("Forwarding search {params:?}");
    let data = catalog.raw_search(&params).await?;
    Ok(([(header::CACHE_CONTROL, SEARCH_CACHE_CONTROL)], Json(data)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookQuery {
    pub country: Option<String>,
}

pub async fn get_book(
    Catalog(catalog): Catalog,
    Path(id): Path<String>,
    Query(query): Query<BookQuery>,
) -> ApiResult<impl IntoResponse> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidRequest("Book ID is required".into()));
    }
    let book = catalog
        .get_by_id(&id, query.country.as_deref())
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::ResourceNotFound("Book".into())
            } else {
                e.into()
            }
        })?;
    Ok(([(header::CACHE_CONTROL, BOOK_CACHE_CONTROL)], Json(book)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/{id}", get(get_book))
}
