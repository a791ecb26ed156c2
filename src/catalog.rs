//! Product catalog view model.

use std::rc::Rc;

use crate::backend::Backend;
use crate::cart::CartStore;
use crate::error::Service;
use crate::models::{Product, ProductListResponse, ProductSearchRequest};

// ---------------------------------------------------------------------------
// CatalogLoader
// ---------------------------------------------------------------------------

/// Loads products and facets from the backend and holds what the catalog
/// view displays.
///
/// Each fetch is one request; whichever fetch completes last determines the
/// product list. A failed fetch sets [`error`](Self::error) to a localized
/// message and leaves the previous products in place.
pub struct CatalogLoader {
    backend: Rc<dyn Backend>,
    cart: Rc<CartStore>,
    products: Vec<Product>,
    total: i64,
    categories: Vec<String>,
    subcategories: Vec<String>,
    colors: Vec<String>,
    active_filter: Option<ProductSearchRequest>,
    loading: bool,
    error: Option<String>,
}

impl CatalogLoader {
    pub fn new(backend: Rc<dyn Backend>, cart: Rc<CartStore>) -> Self {
        Self {
            backend,
            cart,
            products: Vec::new(),
            total: 0,
            categories: Vec::new(),
            subcategories: Vec::new(),
            colors: Vec::new(),
            active_filter: None,
            loading: false,
            error: None,
        }
    }

    // -- Fetching ----------------------------------------------------------

    /// Load the full product list and the facets, as the catalog does when
    /// it is first shown.
    pub fn init(&mut self) {
        self.load_products();
        self.load_categories();
    }

    /// Fetch every product (`GET /products`).
    pub fn load_products(&mut self) {
        self.begin_fetch();
        let result = self.backend.products();
        self.finish_fetch(None, result);
    }

    /// Fetch the category, subcategory and color facets.
    ///
    /// A failure is logged only; the facet lists keep their previous values
    /// and [`error`](Self::error) is left untouched.
    pub fn load_categories(&mut self) {
        match self.backend.categories() {
            Ok(facets) => {
                self.categories = facets.categories;
                self.subcategories = facets.subcategories;
                self.colors = facets.colors;
                info!(
                    categories = self.categories.len(),
                    colors = self.colors.len(),
                    "facets loaded"
                );
            }
            Err(e) => warn!("could not load facets: {}", e),
        }
    }

    pub fn filter_by_category(&mut self, category: &str) {
        self.search(ProductSearchRequest::by_category(category));
    }

    pub fn filter_by_color(&mut self, color: &str) {
        self.search(ProductSearchRequest::by_color(color));
    }

    /// Search with compound criteria (`POST /products/search`).
    pub fn search(&mut self, criteria: ProductSearchRequest) {
        self.begin_fetch();
        let result = self.backend.search_products(&criteria);
        self.finish_fetch(Some(criteria), result);
    }

    /// Drop any filter and reload the full list.
    pub fn clear_filters(&mut self) {
        self.load_products();
    }

    fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish_fetch(
        &mut self,
        filter: Option<ProductSearchRequest>,
        result: crate::backend::ApiResult<ProductListResponse>,
    ) {
        self.loading = false;
        match result {
            Ok(list) => {
                info!(count = list.products.len(), filtered = filter.is_some(), "products loaded");
                self.total = list.total;
                self.products = list.products;
                self.active_filter = filter;
            }
            Err(e) => {
                warn!("could not load products: {}", e);
                self.error = Some(e.message(Service::Catalog));
            }
        }
    }

    // -- Cart --------------------------------------------------------------

    /// Add one unit of `product` to the cart.
    pub fn add_to_cart(&self, product: &Product) {
        self.cart.add_to_cart(product, 1);
    }

    pub fn is_in_cart(&self, product_id: i64) -> bool {
        self.cart.is_in_cart(product_id)
    }

    pub fn cart_quantity(&self, product_id: i64) -> u32 {
        self.cart.product_quantity(product_id)
    }

    // -- State -------------------------------------------------------------

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a loaded product by id.
    pub fn product(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Total reported by the backend for the last successful fetch.
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn subcategories(&self) -> &[String] {
        &self.subcategories
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Criteria of the last successful search, or `None` for the full list.
    pub fn active_filter(&self) -> Option<&ProductSearchRequest> {
        self.active_filter.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
