use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Failure of a call against the storefront backend.
///
/// `detail` carries the `{"detail": "..."}` field of the backend's error body
/// when one was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("server unreachable")]
    Unreachable,

    #[error("bad request: {}", .detail.as_deref().unwrap_or("-"))]
    BadRequest { detail: Option<String> },

    #[error("not found")]
    NotFound,

    #[error("server error: {}", .detail.as_deref().unwrap_or("-"))]
    Server { detail: Option<String> },

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {code}: {}", .detail.as_deref().unwrap_or("-"))]
    Status { code: u16, detail: Option<String> },

    #[error("undecodable response: {0}")]
    Decode(String),
}

/// Which front-end service is reporting the error. The chat and catalog
/// services word some messages differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Chat,
    Catalog,
}

impl ApiError {
    /// Map an HTTP status code and optional `detail` to an error.
    ///
    /// Status 0 means the request never reached the server.
    pub fn from_status(code: u16, detail: Option<String>) -> Self {
        match code {
            0 => ApiError::Unreachable,
            400 => ApiError::BadRequest { detail },
            404 => ApiError::NotFound,
            500 => ApiError::Server { detail },
            _ => ApiError::Status { code, detail },
        }
    }

    /// Localized, user-facing message for this error.
    pub fn message(&self, service: Service) -> String {
        match (self, service) {
            (ApiError::Unreachable, Service::Chat) => {
                "Impossible de contacter le serveur. Vérifiez que l'API est démarrée.".to_string()
            }
            (ApiError::Unreachable, Service::Catalog) => {
                "Impossible de contacter le serveur".to_string()
            }
            (ApiError::BadRequest { detail }, Service::Chat) => detail
                .clone()
                .unwrap_or_else(|| "Requête invalide".to_string()),
            (ApiError::BadRequest { detail }, Service::Catalog) => {
                format!("Erreur 400: {}", detail.as_deref().unwrap_or("Requête invalide"))
            }
            (ApiError::NotFound, Service::Chat) => "Endpoint non trouvé".to_string(),
            (ApiError::NotFound, Service::Catalog) => "Produits non trouvés".to_string(),
            (ApiError::Server { detail }, Service::Chat) => detail
                .clone()
                .unwrap_or_else(|| "Erreur interne du serveur".to_string()),
            (ApiError::Server { .. }, Service::Catalog) => "Erreur interne du serveur".to_string(),
            (ApiError::Timeout, _) => "Délai d'attente dépassé, le serveur ne répond pas".to_string(),
            (ApiError::Status { code, detail }, _) => format!(
                "Erreur {}: {}",
                code,
                detail.as_deref().unwrap_or("réponse inattendue du serveur")
            ),
            (ApiError::Decode(reason), _) => format!("Réponse invalide du serveur: {}", reason),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Chat => f.write_str("chat"),
            Service::Catalog => f.write_str("catalog"),
        }
    }
}
