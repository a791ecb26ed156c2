//! Navigation bar model: cart badge, cart dropdown, and the button that opens
//! the assistant.

use std::cell::Cell;
use std::rc::Rc;

use crate::cart::{CartStore, Subscription};
use crate::models::CartItem;

/// Tracks the cart badge count and the dropdown state.
///
/// The badge is fed by a cart subscription held for the navbar's lifetime;
/// dropping the navbar unsubscribes.
pub struct NavBar {
    cart: Rc<CartStore>,
    item_count: Rc<Cell<u64>>,
    subscription: Subscription,
    dropdown_open: bool,
    chatbot_listeners: Vec<Box<dyn FnMut()>>,
}

impl NavBar {
    pub fn new(cart: Rc<CartStore>) -> Self {
        let item_count = Rc::new(Cell::new(0));
        let badge = Rc::clone(&item_count);
        let subscription = cart.subscribe_total_items(move |count| badge.set(count));
        Self {
            cart,
            item_count,
            subscription,
            dropdown_open: false,
            chatbot_listeners: Vec::new(),
        }
    }

    /// Count shown on the cart badge.
    pub fn item_count(&self) -> u64 {
        self.item_count.get()
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Document-wide click handler: a click outside the cart container
    /// closes the dropdown.
    pub fn handle_document_click(&mut self, inside_cart_container: bool) {
        if !inside_cart_container {
            self.dropdown_open = false;
        }
    }

    /// Lines listed in the dropdown.
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.cart.current_cart().items
    }

    pub fn cart_total_price(&self) -> f64 {
        self.cart.total_price()
    }

    /// Empty the cart from the dropdown and close it.
    pub fn clear_cart(&mut self) {
        self.cart.clear_cart();
        self.dropdown_open = false;
    }

    /// Register a handler for the "open assistant" button.
    pub fn on_open_chatbot<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.chatbot_listeners.push(Box::new(listener));
    }

    /// Emit the "open assistant" event.
    pub fn open_chatbot(&mut self) {
        debug!("opening assistant");
        for listener in &mut self.chatbot_listeners {
            listener();
        }
    }
}

impl Drop for NavBar {
    fn drop(&mut self) {
        self.cart.unsubscribe(&self.subscription);
    }
}
