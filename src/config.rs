use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "ecommerce_cart";

/// User id sent with chat requests when none is configured.
pub const DEFAULT_USER_ID: &str = "storefront-user";

pub const HEALTH_PATH: &str = "/health";
pub const CHAT_PATH: &str = "/chat";
pub const PRODUCTS_PATH: &str = "/products";
pub const SEARCH_PATH: &str = "/products/search";
pub const CATEGORIES_PATH: &str = "/products/categories";

/// Per-endpoint request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// `/chat`
    pub chat: Duration,
    /// `/products` and `/products/search`
    pub products: Duration,
    /// `/health`
    pub health: Duration,
    /// `/products/categories`
    pub categories: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            chat: Duration::from_secs(10),
            products: Duration::from_secs(10),
            health: Duration::from_secs(5),
            categories: Duration::from_secs(5),
        }
    }
}

pub fn default_storage_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("storefront-sdk")
    } else {
        PathBuf::from(".storefront-sdk")
    }
}
