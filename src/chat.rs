//! Shopping assistant chat session.
//!
//! A session checks connectivity with `GET /health` before it accepts any
//! message. While connected, each user turn is appended to the transcript,
//! sent to `POST /chat`, and answered by an assistant message carrying the
//! recommended products, or by an error-flagged message.

use std::fmt;
use std::rc::Rc;

use crate::backend::Backend;
use crate::cart::CartStore;
use crate::error::Service;
use crate::models::{ChatRequest, Message, Product};

pub const WELCOME_MESSAGE: &str = "🛍️ Bonjour ! Je suis votre assistant shopping IA. \
Je peux vous aider à trouver des produits selon vos critères !\n\n\
💡 Exemples de recherches :\n\
• \"Je veux une casquette rouge\"\n\
• \"Un cadeau pour ma fille qui aime le bleu, budget 40 DT\"\n\
• \"Montrez-moi des bijoux\"\n\n\
Que recherchez-vous aujourd'hui ?";

pub const CONNECTION_ERROR_MESSAGE: &str =
    "Erreur : Impossible de se connecter au serveur. Vérifiez que l'API est démarrée.";

pub const NOT_CONNECTED_MESSAGE: &str = "Erreur : Pas de connexion au serveur";

pub const CLEARED_MESSAGE: &str =
    "🛍️ Conversation effacée. Comment puis-je vous aider à trouver des produits ?";

pub const CONNECTION_OK_MESSAGE: &str = "Connexion API réussie !";

pub const CONNECTION_FAILED_MESSAGE: &str = "Échec de connexion API";

/// Where the session is in its connectivity lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    /// Health check not answered yet.
    Checking,
    /// Health check succeeded; messages are sent.
    Ready,
    /// Health check failed; messages are refused locally.
    Disconnected,
}

/// Connection status shown next to the chat header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Checking,
    Testing,
    Connected,
    Disconnected,
}

impl ApiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "Vérification...",
            ApiStatus::Testing => "Test en cours...",
            ApiStatus::Connected => "Connecté",
            ApiStatus::Disconnected => "Déconnecté",
        }
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

/// A chat with the shopping assistant.
///
/// [`send_message`](Self::send_message) takes `&mut self` and returns only
/// once the backend has answered or timed out, so a session never has more
/// than one request in flight.
pub struct ChatSession {
    backend: Rc<dyn Backend>,
    cart: Rc<CartStore>,
    user_id: String,
    messages: Vec<Message>,
    phase: ChatPhase,
    status: ApiStatus,
    loading: bool,
}

impl ChatSession {
    /// Create a session in the [`ChatPhase::Checking`] phase with an empty
    /// transcript. Call [`initialize`](Self::initialize) to run the health
    /// check.
    pub fn new(backend: Rc<dyn Backend>, cart: Rc<CartStore>, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            cart,
            user_id: user_id.into(),
            messages: Vec::new(),
            phase: ChatPhase::Checking,
            status: ApiStatus::Checking,
            loading: false,
        }
    }

    /// Run the health check and seed the transcript with either the welcome
    /// message or a connectivity error.
    pub fn initialize(&mut self) {
        info!("initializing chat session");
        self.phase = ChatPhase::Checking;
        self.status = ApiStatus::Checking;

        if self.check_health() {
            self.push(Message::assistant(WELCOME_MESSAGE));
        } else {
            self.push(Message::error(CONNECTION_ERROR_MESSAGE));
        }
    }

    /// Send a user turn to the assistant.
    ///
    /// Blank input is ignored. While disconnected, an error message is
    /// appended and nothing is sent.
    pub fn send_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if self.phase != ChatPhase::Ready {
            self.push(Message::error(NOT_CONNECTED_MESSAGE));
            return;
        }

        self.push(Message::user(text));
        self.loading = true;

        let request = ChatRequest {
            message: text.to_string(),
            user_id: self.user_id.clone(),
        };
        match self.backend.chat(&request) {
            Ok(response) => {
                info!(products = response.products.len(), "assistant replied");
                let reply = Message::assistant(response.response)
                    .with_products(response.products)
                    .with_questions(response.questions.unwrap_or_default());
                self.push(reply);
            }
            Err(e) => {
                warn!("chat request failed: {}", e);
                self.push(Message::error(format!(
                    "Erreur : {}",
                    e.message(Service::Chat)
                )));
            }
        }

        self.loading = false;
    }

    /// Empty the transcript and greet again.
    pub fn clear_chat(&mut self) {
        self.messages.clear();
        self.push(Message::assistant(CLEARED_MESSAGE));
    }

    /// Re-run the health check on request and report the outcome in the
    /// transcript.
    pub fn test_connection(&mut self) {
        self.status = ApiStatus::Testing;
        if self.check_health() {
            self.push(Message::assistant(CONNECTION_OK_MESSAGE));
        } else {
            self.push(Message::error(CONNECTION_FAILED_MESSAGE));
        }
    }

    /// Add one unit of a recommended product to the cart and confirm in the
    /// transcript.
    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add_to_cart(product, 1);
        self.push(Message::assistant(format!(
            "✅ {} ajouté au panier ! 🛒\n\n💡 Vous pouvez continuer vos achats ou voir votre panier dans la barre de navigation.",
            product.name
        )));
    }

    fn check_health(&mut self) -> bool {
        match self.backend.health() {
            Ok(health) => {
                debug!(status = ?health.status, "health check passed");
                self.phase = ChatPhase::Ready;
                self.status = ApiStatus::Connected;
                true
            }
            Err(e) => {
                warn!("health check failed: {}", e);
                self.phase = ChatPhase::Disconnected;
                self.status = ApiStatus::Disconnected;
                false
            }
        }
    }

    fn push(&mut self, message: Message) {
        debug!(user = message.is_user(), error = message.is_error, "message appended");
        self.messages.push(message);
    }

    // -- State -------------------------------------------------------------

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn status(&self) -> ApiStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.phase == ChatPhase::Ready
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
