//! Storefront SDK for Rust.
//!
//! Client-side components of the storefront: a cart persisted in local
//! storage, a product catalog loader, a shopping-assistant chat session, and
//! the navigation bar model that shows the cart badge. Product search and
//! language understanding happen on the backend, which is reached over HTTP.
//!
//! # Quick start
//!
//! ```no_run
//! use storefront_sdk::Storefront;
//!
//! let shop = Storefront::builder()
//!     .base_url("http://localhost:8000")
//!     .build()
//!     .unwrap();
//!
//! // Browse the catalog
//! let mut catalog = shop.catalog();
//! catalog.init();
//! if let Some(product) = catalog.products().first().cloned() {
//!     catalog.add_to_cart(&product);
//! }
//!
//! // Ask the assistant
//! let mut chat = shop.open_chat();
//! chat.send_message("Je veux une casquette rouge");
//! ```

#[macro_use]
extern crate tracing;

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod navbar;
pub mod storage;

pub use backend::{Backend, HttpBackend};
pub use cart::{CartStore, Subscription};
pub use catalog::CatalogLoader;
pub use chat::{ApiStatus, ChatPhase, ChatSession};
pub use config::Timeouts;
pub use error::{ApiError, Result, Service, StorefrontError};
pub use navbar::NavBar;
pub use storage::{FileStorage, MemoryStorage, Storage};

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

// ---------------------------------------------------------------------------
// StorefrontBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Storefront`].
///
/// Use [`Storefront::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](StorefrontBuilder::build).
pub struct StorefrontBuilder {
    base_url: String,
    storage_dir: Option<PathBuf>,
    in_memory: bool,
    user_id: String,
    timeouts: Timeouts,
    backend: Option<Rc<dyn Backend>>,
}

impl Default for StorefrontBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            storage_dir: None,
            in_memory: false,
            user_id: config::DEFAULT_USER_ID.to_string(),
            timeouts: Timeouts::default(),
            backend: None,
        }
    }
}

impl StorefrontBuilder {
    /// Set the backend base URL. Defaults to `http://localhost:8000`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the directory the cart is persisted in.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/storefront-sdk` on Linux).
    pub fn storage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the cart in memory only. Defaults to `false`.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Set the user id sent with chat messages.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Override the per-endpoint request timeouts.
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Use a custom [`Backend`] instead of HTTP. The base URL and timeouts
    /// are then ignored.
    pub fn backend<B: Backend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Rc::new(backend));
        self
    }

    /// Build the storefront, restoring the persisted cart.
    pub fn build(self) -> Result<Storefront> {
        if self.user_id.trim().is_empty() {
            return Err(StorefrontError::InvalidArgument(
                "user id must not be empty".to_string(),
            ));
        }

        let backend: Rc<dyn Backend> = match self.backend {
            Some(backend) => backend,
            None => Rc::new(HttpBackend::new(self.base_url.clone(), self.timeouts)?),
        };

        let (cart, storage_dir) = if self.in_memory {
            (CartStore::in_memory(), None)
        } else {
            let storage = FileStorage::new(self.storage_dir)?;
            let dir = storage.dir.clone();
            (CartStore::new(storage), Some(dir))
        };

        Ok(Storefront {
            cart: Rc::new(cart),
            backend,
            base_url: self.base_url,
            user_id: self.user_id,
            storage_dir,
        })
    }
}

// ---------------------------------------------------------------------------
// Storefront
// ---------------------------------------------------------------------------

/// Entry point of the SDK.
///
/// Owns the session's single [`CartStore`] and the backend, and hands out the
/// components that share them.
pub struct Storefront {
    cart: Rc<CartStore>,
    backend: Rc<dyn Backend>,
    base_url: String,
    user_id: String,
    storage_dir: Option<PathBuf>,
}

impl Storefront {
    /// Create a new builder for configuring the storefront.
    pub fn builder() -> StorefrontBuilder {
        StorefrontBuilder::default()
    }

    /// The shared cart store.
    pub fn cart(&self) -> &Rc<CartStore> {
        &self.cart
    }

    /// The backend the components talk to.
    pub fn backend(&self) -> Rc<dyn Backend> {
        Rc::clone(&self.backend)
    }

    /// A catalog loader bound to this storefront. Nothing is fetched until
    /// [`CatalogLoader::init`] or a load method is called.
    pub fn catalog(&self) -> CatalogLoader {
        CatalogLoader::new(self.backend(), Rc::clone(&self.cart))
    }

    /// A chat session that has not run its health check yet.
    pub fn chat(&self) -> ChatSession {
        ChatSession::new(self.backend(), Rc::clone(&self.cart), self.user_id.clone())
    }

    /// A chat session with its health check done.
    pub fn open_chat(&self) -> ChatSession {
        let mut session = self.chat();
        session.initialize();
        session
    }

    /// A navigation bar subscribed to the cart.
    pub fn navbar(&self) -> NavBar {
        NavBar::new(Rc::clone(&self.cart))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Directory the cart is persisted in, or `None` for an in-memory cart.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }
}

impl fmt::Display for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Storefront(base_url={}, storage={}, cart_items={})",
            self.base_url,
            self.storage_dir
                .as_deref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "memory".to_string()),
            self.cart.total_items()
        )
    }
}
