//! Shared test fixtures for the storefront SDK integration tests.
//!
//! Provides sample products and [`FakeBackend`], an in-process stand-in for
//! the storefront API that records every call it receives.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use storefront_sdk::backend::{ApiResult, Backend};
use storefront_sdk::models::{
    CategoriesResponse, ChatRequest, ChatResponse, HealthStatus, Product, ProductListResponse,
    ProductSearchRequest,
};
use storefront_sdk::ApiError;

pub fn product(id: i64, name: &str, category: &str, color: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: category.to_string(),
        subcategory: String::new(),
        color: color.to_string(),
        price,
        currency: "DT".to_string(),
        description: format!("{} en coton", name),
        tags: vec!["casual".to_string()],
        age_group: "adulte".to_string(),
        gender: "unisexe".to_string(),
        image: format!("product_{}.jpg", id),
        stock: 10,
    }
}

/// Casquette (25 DT), Bracelet (40 DT, out of stock), T-shirt (18.5 DT).
pub fn sample_products() -> Vec<Product> {
    let mut products = vec![
        product(1, "Casquette Rouge Classique", "accessoires", "rouge", 25.0),
        product(2, "Bracelet Doré", "bijoux", "doré", 40.0),
        product(3, "T-shirt Bleu", "vetements", "bleu", 18.5),
    ];
    products[0].subcategory = "casquettes".to_string();
    products[1].subcategory = "bracelets".to_string();
    products[1].stock = 0;
    products[2].subcategory = "t-shirts".to_string();
    products
}

fn list(products: Vec<Product>) -> ProductListResponse {
    ProductListResponse {
        total: products.len() as i64,
        products,
        filters_applied: None,
    }
}

// ---------------------------------------------------------------------------
// FakeBackend
// ---------------------------------------------------------------------------

/// Scriptable backend. Health succeeds, products come from
/// [`sample_products`], and chat replies with the first product, until a
/// test sets one of the `*_error` fields.
pub struct FakeBackend {
    pub healthy: Cell<bool>,
    pub chat_error: RefCell<Option<ApiError>>,
    pub products_error: RefCell<Option<ApiError>>,
    pub categories_error: RefCell<Option<ApiError>>,
    pub questions: RefCell<Option<Vec<String>>>,
    pub catalog: RefCell<Vec<Product>>,
    pub calls: RefCell<Vec<&'static str>>,
    pub chat_requests: RefCell<Vec<ChatRequest>>,
    pub search_requests: RefCell<Vec<ProductSearchRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            healthy: Cell::new(true),
            chat_error: RefCell::new(None),
            products_error: RefCell::new(None),
            categories_error: RefCell::new(None),
            questions: RefCell::new(None),
            catalog: RefCell::new(sample_products()),
            calls: RefCell::new(Vec::new()),
            chat_requests: RefCell::new(Vec::new()),
            search_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn unhealthy() -> Self {
        let backend = Self::new();
        backend.healthy.set(false);
        backend
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == endpoint).count()
    }
}

impl Backend for FakeBackend {
    fn health(&self) -> ApiResult<HealthStatus> {
        self.calls.borrow_mut().push("health");
        if self.healthy.get() {
            Ok(HealthStatus {
                status: Some("healthy".to_string()),
                service: Some("chatbot-ecommerce-api".to_string()),
                products_count: Some(self.catalog.borrow().len() as i64),
                timestamp: None,
            })
        } else {
            Err(ApiError::Unreachable)
        }
    }

    fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        self.calls.borrow_mut().push("chat");
        self.chat_requests.borrow_mut().push(request.clone());
        if let Some(err) = self.chat_error.borrow().clone() {
            return Err(err);
        }
        let products: Vec<Product> = self.catalog.borrow().iter().take(1).cloned().collect();
        Ok(ChatResponse {
            response: format!("🛍️ J'ai trouvé {} produit(s) pour vous !", products.len()),
            timestamp: "2024-01-15T10:30:00".to_string(),
            user_message: request.message.clone(),
            products,
            criteria: serde_json::json!({"color": "rouge"}),
            questions: self.questions.borrow().clone(),
        })
    }

    fn products(&self) -> ApiResult<ProductListResponse> {
        self.calls.borrow_mut().push("products");
        if let Some(err) = self.products_error.borrow().clone() {
            return Err(err);
        }
        Ok(list(self.catalog.borrow().clone()))
    }

    fn search_products(&self, criteria: &ProductSearchRequest) -> ApiResult<ProductListResponse> {
        self.calls.borrow_mut().push("search");
        self.search_requests.borrow_mut().push(criteria.clone());
        if let Some(err) = self.products_error.borrow().clone() {
            return Err(err);
        }
        let matches = self
            .catalog
            .borrow()
            .iter()
            .filter(|p| criteria.category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| criteria.color.as_ref().map_or(true, |c| &p.color == c))
            .filter(|p| criteria.max_price.map_or(true, |max| p.price <= max))
            .filter(|p| criteria.min_price.map_or(true, |min| p.price >= min))
            .cloned()
            .collect();
        Ok(list(matches))
    }

    fn categories(&self) -> ApiResult<CategoriesResponse> {
        self.calls.borrow_mut().push("categories");
        if let Some(err) = self.categories_error.borrow().clone() {
            return Err(err);
        }
        let catalog = self.catalog.borrow();
        let mut categories: Vec<String> = catalog.iter().map(|p| p.category.clone()).collect();
        let mut subcategories: Vec<String> = catalog
            .iter()
            .filter(|p| !p.subcategory.is_empty())
            .map(|p| p.subcategory.clone())
            .collect();
        let mut colors: Vec<String> = catalog.iter().map(|p| p.color.clone()).collect();
        categories.sort();
        categories.dedup();
        subcategories.sort();
        subcategories.dedup();
        colors.sort();
        colors.dedup();
        Ok(CategoriesResponse {
            categories,
            subcategories,
            colors,
        })
    }
}
