//! Cart Store
//!
//! Owns the current cart, applies actions through [`reduce`] and persists every result.

use std::mem;

use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    cart::{Cart, CartAction, reduce},
    items::LineItem,
    persistence::CartPersistence,
    pricing::PricingError,
    products::{Product, ProductId},
    storage::KeyValueStore,
};

/// The application's cart, kept in memory and mirrored to storage after each mutation.
///
/// Mutations always succeed from the caller's point of view: storage failures are logged
/// by the persistence adapter and the in-memory cart stays authoritative.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    persistence: CartPersistence<S>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Hydrate a store from its persisted slot, starting empty if there is none.
    pub fn hydrate(persistence: CartPersistence<S>) -> Self {
        let cart = persistence.load();

        debug!(
            key = persistence.key(),
            lines = cart.len(),
            items = cart.total_item_count(),
            "hydrated cart"
        );

        Self { cart, persistence }
    }

    /// Apply an action and persist the resulting cart.
    pub fn dispatch(&mut self, action: CartAction) {
        let name = action.to_str();
        let current = mem::replace(&mut self.cart, Cart::new(self.persistence.currency()));

        self.cart = reduce(current, action);

        debug!(
            action = name,
            lines = self.cart.len(),
            items = self.cart.total_item_count(),
            "applied cart action"
        );

        self.persistence.save(&self.cart);
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        self.dispatch(CartAction::Add { product, quantity });
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: Product) {
        self.add_item(product, 1);
    }

    /// Set the absolute quantity of a line; zero or below removes it.
    pub fn set_quantity(&mut self, product: &ProductId, quantity: i64) {
        self.dispatch(CartAction::SetQuantity {
            product: product.clone(),
            quantity,
        });
    }

    /// Remove a line, if present.
    pub fn remove_item(&mut self, product: &ProductId) {
        self.dispatch(CartAction::Remove {
            product: product.clone(),
        });
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Sum of line totals.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError::Overflow` if the subtotal cannot be represented in minor units.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        self.cart.subtotal()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The persistence adapter backing this store.
    pub fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }
}
