use std::{sync::Arc, time::Duration};

use hondana_types::{config::CatalogArgs, Book};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    error::{CatalogError, Result},
    transform,
    volume::{Volume, VolumesResponse},
    CatalogSource, OrderBy, SearchPage, SearchParams, DEFAULT_MAX_RESULTS,
};

const API_KEY_PARAM: &str = "key";
const VOLUMES_PATH: &str = "volumes";
const ALL_BOOKS_QUERY: &str = "*";
const BESTSELLERS_CATEGORY: &str = "bestsellers";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Option<Duration>,
}

impl CatalogConfig {
    pub fn new(api_key: impl Into<String>, base_url: Url) -> Self {
        CatalogConfig {
            api_key: api_key.into(),
            base_url,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `None` when API key is not configured
    pub fn from_args(args: &CatalogArgs) -> Option<Self> {
        args.catalog_api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| CatalogConfig {
                api_key: key.clone(),
                base_url: args.catalog_url.clone(),
                timeout: args.catalog_timeout,
            })
    }
}

/// HTTP client of the external book catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: Arc<CatalogConfig>,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(CatalogClient {
            http,
            config: Arc::new(config),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.config.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn search_url(&self, params: &SearchParams) -> Result<Url> {
        let mut url = self.endpoint(&[VOLUMES_PATH])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", &params.query)
                .append_pair("startIndex", &params.start_index.to_string())
                .append_pair("maxResults", &params.max_results.to_string())
                .append_pair(API_KEY_PARAM, &self.config.api_key);
            if let Some(order_by) = params.order_by {
                query.append_pair("orderBy", order_by.as_str());
            }
            if let Some(print_type) = params.print_type {
                query.append_pair("printType", print_type.as_str());
            }
            if let Some(lang) = non_empty(&params.lang_restrict) {
                query.append_pair("langRestrict", lang);
            }
            if let Some(country) = non_empty(&params.country) {
                query.append_pair("country", country);
            }
        }
        Ok(url)
    }

    pub(crate) fn volume_url(&self, id: &str, country: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint(&[VOLUMES_PATH, id])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(API_KEY_PARAM, &self.config.api_key);
            if let Some(country) = country.filter(|c| !c.is_empty()) {
                query.append_pair("country", country);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Catalog request to {}", url.path());
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Catalog responded with status {status}");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Untransformed catalog response, as consumed by forwarding API
    pub async fn raw_search(&self, params: &SearchParams) -> Result<serde_json::Value> {
        let url = self.search_url(params)?;
        self.get_json(url).await
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        let url = self.search_url(params)?;
        let data: VolumesResponse = self.get_json(url).await?;
        let books = data.items.into_iter().map(transform).collect::<Vec<_>>();
        debug!(
            "Catalog search returned {} of {} items",
            books.len(),
            data.total_items
        );
        Ok(SearchPage::new(books, data.total_items, params.start_index))
    }

    pub async fn get_by_id(&self, id: &str, country: Option<&str>) -> Result<Book> {
        let url = self.volume_url(id, country)?;
        let volume: Volume = self.get_json(url).await?;
        Ok(transform(volume))
    }

    /// Recommendations for a country, optionally narrowed to a subject category
    pub async fn books_by_country(
        &self,
        country: &str,
        category: Option<&str>,
        max_results: Option<u32>,
    ) -> Result<SearchPage> {
        let query = match category {
            Some(category) if category != BESTSELLERS_CATEGORY && !category.is_empty() => {
                format!("subject:{category}")
            }
            _ => ALL_BOOKS_QUERY.to_string(),
        };
        let params = SearchParams::new(query)
            .country(country)
            .max_results(max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .order_by(OrderBy::Relevance);
        self.search(&params).await
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl CatalogSource for CatalogClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        CatalogClient::search(self, params).await
    }

    async fn get_by_id(&self, id: &str, country: Option<&str>) -> Result<Book> {
        CatalogClient::get_by_id(self, id, country).await
    }
}
