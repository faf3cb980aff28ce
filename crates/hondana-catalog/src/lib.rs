#![allow(async_fn_in_trait)]
use std::{fmt::Display, str::FromStr};

use hondana_types::Book;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod error;
pub mod transform;
pub mod volume;

pub use client::{CatalogClient, CatalogConfig};
pub use error::{CatalogError, Result};
pub use transform::transform;

pub const DEFAULT_MAX_RESULTS: u32 = 10;
/// Upper limit accepted by the catalog for one page
pub const MAX_RESULTS_LIMIT: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Relevance,
    Newest,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Relevance => "relevance",
            OrderBy::Newest => "newest",
        }
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(OrderBy::Relevance),
            "newest" => Ok(OrderBy::Newest),
            other => Err(format!("Unknown ordering {other}, use relevance or newest")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintType {
    All,
    Books,
    Magazines,
}

impl PrintType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintType::All => "all",
            PrintType::Books => "books",
            PrintType::Magazines => "magazines",
        }
    }
}

/// Parameters of one catalog search page.
///
/// `query` must not be empty, it is responsibility of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub start_index: u32,
    pub max_results: u32,
    pub order_by: Option<OrderBy>,
    pub lang_restrict: Option<String>,
    pub country: Option<String>,
    pub print_type: Option<PrintType>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        SearchParams {
            query: query.into(),
            start_index: 0,
            max_results: DEFAULT_MAX_RESULTS,
            order_by: None,
            lang_restrict: None,
            country: None,
            print_type: None,
        }
    }

    pub fn start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn lang_restrict(mut self, lang: impl Into<String>) -> Self {
        self.lang_restrict = Some(lang.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn print_type(mut self, print_type: PrintType) -> Self {
        self.print_type = Some(print_type);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub books: Vec<Book>,
    pub total_items: u64,
    pub start_index: u32,
    pub has_more: bool,
}

impl SearchPage {
    pub fn new(books: Vec<Book>, total_items: u64, start_index: u32) -> Self {
        let has_more = start_index as u64 + (books.len() as u64) < total_items;
        SearchPage {
            books,
            total_items,
            start_index,
            has_more,
        }
    }
}

/// Source of books, implemented by [`CatalogClient`]
pub trait CatalogSource {
    async fn search(&self, params: &SearchParams) -> Result<SearchPage>;
    async fn get_by_id(&self, id: &str, country: Option<&str>) -> Result<Book>;
}

impl<T: CatalogSource> CatalogSource for &T {
    async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        (**self).search(params).await
    }

    async fn get_by_id(&self, id: &str, country: Option<&str>) -> Result<Book> {
        (**self).get_by_id(id, country).await
    }
}

impl<T: CatalogSource> CatalogSource for std::sync::Arc<T> {
    async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        (**self).search(params).await
    }

    async fn get_by_id(&self, id: &str, country: Option<&str>) -> Result<Book> {
        (**self).get_by_id(id, country).await
    }
}
