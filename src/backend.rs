//! Access to the storefront HTTP API.
//!
//! [`Backend`] is the contract the catalog and chat components call through;
//! [`HttpBackend`] implements it with a blocking `reqwest` client and the
//! per-endpoint timeouts from [`Timeouts`].

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{self, Timeouts};
use crate::error::{ApiError, Result};
use crate::models::{
    CategoriesResponse, ChatRequest, ChatResponse, HealthStatus, ProductListResponse,
    ProductSearchRequest,
};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The storefront API as seen by the client components.
pub trait Backend {
    /// `GET /health`
    fn health(&self) -> ApiResult<HealthStatus>;

    /// `POST /chat`
    fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse>;

    /// `GET /products`
    fn products(&self) -> ApiResult<ProductListResponse>;

    /// `POST /products/search`
    fn search_products(&self, criteria: &ProductSearchRequest) -> ApiResult<ProductListResponse>;

    /// `GET /products/categories`
    fn categories(&self) -> ApiResult<CategoriesResponse>;
}

impl<B: Backend + ?Sized> Backend for std::rc::Rc<B> {
    fn health(&self) -> ApiResult<HealthStatus> {
        (**self).health()
    }

    fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        (**self).chat(request)
    }

    fn products(&self) -> ApiResult<ProductListResponse> {
        (**self).products()
    }

    fn search_products(&self, criteria: &ProductSearchRequest) -> ApiResult<ProductListResponse> {
        (**self).search_products(criteria)
    }

    fn categories(&self) -> ApiResult<CategoriesResponse> {
        (**self).categories()
    }
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// [`Backend`] over HTTP.
///
/// Every call is a single request: no retries, and a timeout is reported as
/// [`ApiError::Timeout`].
pub struct HttpBackend {
    base_url: String,
    timeouts: Timeouts,
    client: Client,
}

impl HttpBackend {
    /// Create a backend for the API rooted at `base_url`
    /// (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "HTTP backend ready");
        Ok(Self {
            base_url,
            timeouts,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> ApiResult<T> {
        let request = self
            .client
            .get(self.url(path))
            .timeout(timeout)
            .header(ACCEPT, "application/json");
        execute(request, path)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> ApiResult<T> {
        let request = self
            .client
            .post(self.url(path))
            .timeout(timeout)
            .header(ACCEPT, "application/json")
            .json(body);
        execute(request, path)
    }
}

impl Backend for HttpBackend {
    fn health(&self) -> ApiResult<HealthStatus> {
        self.get(config::HEALTH_PATH, self.timeouts.health)
    }

    fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        self.post(config::CHAT_PATH, request, self.timeouts.chat)
    }

    fn products(&self) -> ApiResult<ProductListResponse> {
        self.get(config::PRODUCTS_PATH, self.timeouts.products)
    }

    fn search_products(&self, criteria: &ProductSearchRequest) -> ApiResult<ProductListResponse> {
        self.post(config::SEARCH_PATH, criteria, self.timeouts.products)
    }

    fn categories(&self) -> ApiResult<CategoriesResponse> {
        self.get(config::CATEGORIES_PATH, self.timeouts.categories)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn execute<T: DeserializeOwned>(request: RequestBuilder, path: &str) -> ApiResult<T> {
    debug!(path, "sending request");
    let response = request.send().map_err(|e| transport_error(path, e))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().ok().and_then(|body| extract_detail(&body));
        let err = ApiError::from_status(status.as_u16(), detail);
        warn!(path, status = status.as_u16(), "request failed: {}", err);
        return Err(err);
    }

    let body = response.text().map_err(|e| transport_error(path, e))?;
    serde_json::from_str(&body).map_err(|e| {
        warn!(path, "undecodable response body: {}", e);
        ApiError::Decode(e.to_string())
    })
}

fn transport_error(path: &str, e: reqwest::Error) -> ApiError {
    warn!(path, "transport error: {}", e);
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        // Connect failures, DNS, refused connections: the request never got
        // a status, which the browser reports as status 0.
        ApiError::Unreachable
    }
}

/// Pull the `detail` field out of a FastAPI-style error body.
///
/// A string detail is returned as-is; structured details (validation
/// errors) are returned as compact JSON.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
