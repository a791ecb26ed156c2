//! The cart store: authoritative cart state, persisted after every mutation
//! and broadcast to subscribers.
//!
//! One store is created per session and shared by reference (`Rc<CartStore>`)
//! between the catalog, the chat session and the navigation bar.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::Utc;

use crate::config::CART_STORAGE_KEY;
use crate::models::{Cart, CartItem, Product};
use crate::storage::{MemoryStorage, Storage};

type Callback = Rc<RefCell<dyn FnMut(&Cart)>>;

/// Handle identifying a subscriber registered with [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "dropping the handle keeps the subscriber registered; pass it to `unsubscribe` to stop updates"]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

// ---------------------------------------------------------------------------
// CartStore
// ---------------------------------------------------------------------------

/// Owns the cart, its persistence, and the list of subscribers.
///
/// Every mutation recomputes the totals, writes the cart to storage under
/// [`CART_STORAGE_KEY`], and then hands the full updated cart to every
/// subscriber, synchronously and in mutation order.
///
/// Storage failures never surface to the caller: they are logged and the
/// in-memory cart stays authoritative.
pub struct CartStore {
    cart: RefCell<Cart>,
    storage: Box<dyn Storage>,
    subscribers: RefCell<Vec<(u64, Callback)>>,
    next_id: Cell<u64>,
    pending: RefCell<VecDeque<Cart>>,
    publishing: Cell<bool>,
}

impl CartStore {
    /// Create a store backed by `storage`, restoring any cart saved there.
    ///
    /// A missing, unreadable or malformed entry yields an empty cart.
    pub fn new<S: Storage + 'static>(storage: S) -> Self {
        let cart = load_cart(&storage);
        debug!(items = cart.items.len(), "cart store initialized");
        Self {
            cart: RefCell::new(cart),
            storage: Box::new(storage),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            publishing: Cell::new(false),
        }
    }

    /// Create a store that keeps the cart in memory only.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    // -- Mutations ---------------------------------------------------------

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased;
    /// otherwise a new line is appended. Adding zero units does nothing.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.commit(|cart| {
            match cart.item_mut(product.id) {
                Some(item) => item.quantity = item.quantity.saturating_add(quantity),
                None => cart.items.push(CartItem {
                    product: product.clone(),
                    quantity,
                    added_at: Utc::now(),
                }),
            }
            true
        });
        info!(product = %product.name, quantity, "added to cart");
    }

    /// Remove the line for `product_id`. Removing an absent product is a no-op.
    pub fn remove_from_cart(&self, product_id: i64) {
        let removed = self.commit(|cart| {
            let before = cart.items.len();
            cart.items.retain(|i| i.product.id != product_id);
            cart.items.len() != before
        });
        if removed {
            info!(product_id, "removed from cart");
        }
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero or less removes the line; quantities above
    /// `u32::MAX` are clamped. Does nothing if the product is not in the cart.
    pub fn update_quantity(&self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.commit(|cart| match cart.item_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        });
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.commit(|cart| {
            cart.items.clear();
            true
        });
        info!("cart cleared");
    }

    // -- Queries -----------------------------------------------------------

    /// A copy of the current cart.
    pub fn current_cart(&self) -> Cart {
        self.cart.borrow().clone()
    }

    pub fn is_in_cart(&self, product_id: i64) -> bool {
        self.cart.borrow().item(product_id).is_some()
    }

    /// Quantity of `product_id` in the cart, or 0 if absent.
    pub fn product_quantity(&self, product_id: i64) -> u32 {
        self.cart
            .borrow()
            .item(product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn total_items(&self) -> u64 {
        self.cart.borrow().total_items
    }

    pub fn total_price(&self) -> f64 {
        self.cart.borrow().total_price
    }

    // -- Subscriptions -----------------------------------------------------

    /// Register `callback` to receive the cart after every mutation.
    ///
    /// The callback is invoked once right away with the current cart. A
    /// mutation made from inside a callback is queued and delivered to all
    /// subscribers once the current delivery round finishes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Cart) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let callback: Callback = Rc::new(RefCell::new(callback));
        self.subscribers
            .borrow_mut()
            .push((id, Rc::clone(&callback)));

        // Mutations made by the callback during this first delivery are queued
        // like any other nested mutation.
        let current = self.current_cart();
        let nested = self.publishing.replace(true);
        (&mut *callback.borrow_mut())(&current);
        self.publishing.set(nested);
        if !nested {
            self.drain();
        }

        Subscription { id }
    }

    /// Subscribe to the total item count only.
    pub fn subscribe_total_items<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(u64) + 'static,
    {
        self.subscribe(move |cart| callback(cart.total_items))
    }

    /// Subscribe to the total price only.
    pub fn subscribe_total_price<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(f64) + 'static,
    {
        self.subscribe(move |cart| callback(cart.total_price))
    }

    /// Stop delivering updates to `subscription`.
    ///
    /// Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != subscription.id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    // -- Internals ---------------------------------------------------------

    /// Apply `mutate`; if it reports a change, recompute totals, persist and
    /// publish. Returns whether anything changed.
    fn commit<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let snapshot = {
            let mut cart = self.cart.borrow_mut();
            if !mutate(&mut cart) {
                return false;
            }
            cart.recompute_totals();
            cart.clone()
        };
        self.save(&snapshot);
        self.publish(snapshot);
        true
    }

    fn save(&self, cart: &Cart) {
        let result = serde_json::to_string(cart)
            .map_err(crate::StorefrontError::from)
            .and_then(|raw| self.storage.set_item(CART_STORAGE_KEY, &raw));
        if let Err(e) = result {
            warn!("could not save cart: {}", e);
        }
    }

    fn publish(&self, snapshot: Cart) {
        self.pending.borrow_mut().push_back(snapshot);
        if !self.publishing.get() {
            self.drain();
        }
    }

    fn drain(&self) {
        self.publishing.set(true);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(cart) = next else {
                break;
            };
            let targets: Vec<Callback> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, cb)| Rc::clone(cb))
                .collect();
            for cb in targets {
                (&mut *cb.borrow_mut())(&cart);
            }
        }
        self.publishing.set(false);
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn load_cart(storage: &dyn Storage) -> Cart {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::default(),
        Err(e) => {
            warn!("could not load cart: {}", e);
            return Cart::default();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(mut cart) => {
            cart.normalize();
            cart
        }
        Err(e) => {
            warn!("stored cart is malformed, starting empty: {}", e);
            Cart::default()
        }
    }
}
