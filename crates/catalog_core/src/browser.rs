//! Paged category strip and category-membership product filtering.

use shared::{
    catalog::{CategorySummary, ProductSummary},
    domain::CategoryId,
};

pub const DEFAULT_STRIP_WIDTH: usize = 6;

#[derive(Debug, Clone)]
enum SourceSlot<T> {
    Loading,
    Resolved(Vec<T>),
}

impl<T> SourceSlot<T> {
    fn resolved(&self) -> Option<&[T]> {
        match self {
            Self::Loading => None,
            Self::Resolved(items) => Some(items),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductListing {
    Loading,
    Empty,
    Populated(Vec<ProductSummary>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StripView {
    pub categories: Vec<CategorySummary>,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub strip: StripView,
    pub listing: ProductListing,
    pub selection: Option<CategoryId>,
}

#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    strip_width: usize,
    start_index: usize,
    categories: SourceSlot<CategorySummary>,
    products: SourceSlot<ProductSummary>,
    selected: Option<CategoryId>,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self::new(DEFAULT_STRIP_WIDTH)
    }
}

impl CatalogBrowser {
    pub fn new(strip_width: usize) -> Self {
        assert!(strip_width >= 1, "strip width must be at least 1");
        Self {
            strip_width,
            start_index: 0,
            categories: SourceSlot::Loading,
            products: SourceSlot::Loading,
            selected: None,
        }
    }

    pub fn strip_width(&self) -> usize {
        self.strip_width
    }

    fn category_count(&self) -> usize {
        self.categories.resolved().map_or(0, |categories| categories.len())
    }

    fn max_start(&self) -> usize {
        self.category_count().saturating_sub(self.strip_width)
    }

    pub fn set_categories(&mut self, categories: Vec<CategorySummary>) {
        self.categories = SourceSlot::Resolved(categories);
        // A reload may shrink the sequence below the held offset; restart from
        // the first page rather than exposing an out-of-range slice.
        if self.start_index > self.max_start() {
            self.start_index = 0;
        }
    }

    pub fn set_products(&mut self, products: Vec<ProductSummary>) {
        self.products = SourceSlot::Resolved(products);
    }

    pub fn has_next(&self) -> bool {
        self.start_index + self.strip_width < self.category_count()
    }

    pub fn has_prev(&self) -> bool {
        self.start_index > 0
    }

    pub fn show_next(&mut self) {
        if self.has_next() {
            self.start_index = (self.start_index + self.strip_width).min(self.max_start());
        }
    }

    pub fn show_prev(&mut self) {
        if self.has_prev() {
            self.start_index = self.start_index.saturating_sub(self.strip_width);
        }
    }

    pub fn visible_categories(&self) -> &[CategorySummary] {
        let Some(categories) = self.categories.resolved() else {
            return &[];
        };
        let end = (self.start_index + self.strip_width).min(categories.len());
        &categories[self.start_index..end]
    }

    pub fn select(&mut self, category_id: CategoryId) {
        self.selected = Some(category_id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selection(&self) -> Option<CategoryId> {
        self.selected
    }

    pub fn strip_view(&self) -> StripView {
        StripView {
            categories: self.visible_categories().to_vec(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }

    pub fn product_listing(&self) -> ProductListing {
        let Some(products) = self.products.resolved() else {
            return ProductListing::Loading;
        };
        let filtered = filter_by_category(products, self.selected);
        if filtered.is_empty() {
            ProductListing::Empty
        } else {
            ProductListing::Populated(filtered)
        }
    }

    pub fn view(&self) -> CatalogView {
        CatalogView {
            strip: self.strip_view(),
            listing: self.product_listing(),
            selection: self.selected,
        }
    }
}

pub fn filter_by_category(
    products: &[ProductSummary],
    selection: Option<CategoryId>,
) -> Vec<ProductSummary> {
    match selection {
        None => products.to_vec(),
        Some(category_id) => products
            .iter()
            .filter(|product| product.categories.contains(&category_id))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
