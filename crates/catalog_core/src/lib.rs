use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    catalog::{CategorySummary, ProductSummary},
    domain::CategoryId,
    error::ApiError,
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

mod browser;

pub use browser::{
    filter_by_category, CatalogBrowser, CatalogView, ProductListing, StripView,
    DEFAULT_STRIP_WIDTH,
};

#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<CategorySummary>>;
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<ProductSummary>>;
}

pub struct MissingCategorySource;

#[async_trait]
impl CategorySource for MissingCategorySource {
    async fn fetch_categories(&self) -> Result<Vec<CategorySummary>> {
        Err(anyhow!("category source is unavailable"))
    }
}

pub struct MissingProductSource;

#[async_trait]
impl ProductSource for MissingProductSource {
    async fn fetch_products(&self) -> Result<Vec<ProductSummary>> {
        Err(anyhow!("product source is unavailable"))
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog API rejected {path}: {error}")]
    Api { path: &'static str, error: ApiError },
    #[error("catalog API returned status {status} for {path}")]
    Status {
        path: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("failed to reach catalog API for {path}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid payload from {path}")]
    Decode {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

pub struct StorefrontClient {
    http: Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_collection<T>(&self, path: &'static str) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|source| FetchError::Transport { path, source })?;

        let status = response.status();
        if !status.is_success() {
            // The catalog API reports failures as an ApiError JSON body; fall
            // back to the bare status when the body is something else.
            let body = response.text().await.unwrap_or_default();
            if let Ok(error) = serde_json::from_str::<ApiError>(&body) {
                return Err(FetchError::Api { path, error });
            }
            return Err(FetchError::Status { path, status });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { path, source })
    }
}

#[async_trait]
impl CategorySource for StorefrontClient {
    async fn fetch_categories(&self) -> Result<Vec<CategorySummary>> {
        Ok(self.get_collection("/categories").await?)
    }
}

#[async_trait]
impl ProductSource for StorefrontClient {
    async fn fetch_products(&self) -> Result<Vec<ProductSummary>> {
        Ok(self.get_collection("/products").await?)
    }
}

#[derive(Debug, Clone)]
pub enum CatalogEvent {
    StripUpdated(StripView),
    ListingUpdated(ProductListing),
    SelectionChanged(Option<CategoryId>),
    Error(String),
}

pub struct CatalogService {
    categories: Arc<dyn CategorySource>,
    products: Arc<dyn ProductSource>,
    inner: Mutex<ServiceState>,
    events: broadcast::Sender<CatalogEvent>,
}

struct ServiceState {
    browser: CatalogBrowser,
    category_generation: u64,
    product_generation: u64,
}

impl CatalogService {
    pub fn new(categories: Arc<dyn CategorySource>, products: Arc<dyn ProductSource>) -> Arc<Self> {
        Self::new_with_browser(categories, products, CatalogBrowser::default())
    }

    pub fn new_with_browser(
        categories: Arc<dyn CategorySource>,
        products: Arc<dyn ProductSource>,
        browser: CatalogBrowser,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            categories,
            products,
            inner: Mutex::new(ServiceState {
                browser,
                category_generation: 0,
                product_generation: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> CatalogView {
        self.inner.lock().await.browser.view()
    }

    pub async fn refresh(self: &Arc<Self>) {
        self.refresh_categories().await;
        self.refresh_products().await;
    }

    pub async fn refresh_categories(self: &Arc<Self>) {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.category_generation += 1;
            guard.category_generation
        };
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let result = service.categories.fetch_categories().await;
            service.apply_category_result(generation, result).await;
        });
    }

    pub async fn refresh_products(self: &Arc<Self>) {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.product_generation += 1;
            guard.product_generation
        };
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let result = service.products.fetch_products().await;
            service.apply_product_result(generation, result).await;
        });
    }

    async fn apply_category_result(&self, generation: u64, result: Result<Vec<CategorySummary>>) {
        let strip = {
            let mut guard = self.inner.lock().await;
            if generation != guard.category_generation {
                info!(
                    generation,
                    current = guard.category_generation,
                    "catalog: discarding stale category response"
                );
                return;
            }
            let categories = match result {
                Ok(categories) => categories,
                Err(err) => {
                    warn!("catalog: category load failed; treating as empty: {err}");
                    let _ = self
                        .events
                        .send(CatalogEvent::Error(format!("failed to load categories: {err}")));
                    Vec::new()
                }
            };
            guard.browser.set_categories(categories);
            guard.browser.strip_view()
        };
        let _ = self.events.send(CatalogEvent::StripUpdated(strip));
    }

    async fn apply_product_result(&self, generation: u64, result: Result<Vec<ProductSummary>>) {
        let listing = {
            let mut guard = self.inner.lock().await;
            if generation != guard.product_generation {
                info!(
                    generation,
                    current = guard.product_generation,
                    "catalog: discarding stale product response"
                );
                return;
            }
            let products = match result {
                Ok(products) => products,
                Err(err) => {
                    warn!("catalog: product load failed; treating as empty: {err}");
                    let _ = self
                        .events
                        .send(CatalogEvent::Error(format!("failed to load products: {err}")));
                    Vec::new()
                }
            };
            guard.browser.set_products(products);
            guard.browser.product_listing()
        };
        let _ = self.events.send(CatalogEvent::ListingUpdated(listing));
    }

    pub async fn show_next(&self) {
        let strip = {
            let mut guard = self.inner.lock().await;
            guard.browser.show_next();
            guard.browser.strip_view()
        };
        let _ = self.events.send(CatalogEvent::StripUpdated(strip));
    }

    pub async fn show_prev(&self) {
        let strip = {
            let mut guard = self.inner.lock().await;
            guard.browser.show_prev();
            guard.browser.strip_view()
        };
        let _ = self.events.send(CatalogEvent::StripUpdated(strip));
    }

    pub async fn select_category(&self, category_id: CategoryId) {
        let listing = {
            let mut guard = self.inner.lock().await;
            guard.browser.select(category_id);
            guard.browser.product_listing()
        };
        let _ = self
            .events
            .send(CatalogEvent::SelectionChanged(Some(category_id)));
        let _ = self.events.send(CatalogEvent::ListingUpdated(listing));
    }

    pub async fn clear_selection(&self) {
        let listing = {
            let mut guard = self.inner.lock().await;
            guard.browser.clear_selection();
            guard.browser.product_listing()
        };
        let _ = self.events.send(CatalogEvent::SelectionChanged(None));
        let _ = self.events.send(CatalogEvent::ListingUpdated(listing));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
