use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

// ---------------------------------------------------------------------------
// Message — One transcript entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub products: Vec<Product>,
    /// Follow-up questions the assistant attached to its reply.
    #[serde(default)]
    pub questions: Vec<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User, false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Assistant, false)
    }

    /// An error-flagged assistant message.
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Assistant, true)
    }

    fn new(content: impl Into<String>, sender: Sender, is_error: bool) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            is_error,
            products: Vec::new(),
            questions: Vec::new(),
        }
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_questions(mut self, questions: Vec<String>) -> Self {
        self.questions = questions;
        self
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
