//! Cart persistence
//!
//! Saves a cart into one slot of a [`KeyValueStore`] and rehydrates it at start-up.
//!
//! The slot holds a JSON array of
//! `{productId, name, imageRef, unitPrice, availableInventory, quantity}` objects. Saving
//! never fails from the caller's point of view, and loading treats an absent or unreadable
//! slot as an empty cart.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError},
    items::LineItem,
    products::{Product, ProductError},
    storage::{KeyValueStore, StorageError},
};

/// Storage key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors raised while saving or loading a cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The substrate failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The slot did not hold a valid JSON line item array.
    #[error("failed to decode persisted cart: {0}")]
    Decode(#[source] serde_json::Error),

    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),

    /// A persisted line had a zero quantity (index).
    #[error("persisted item {0} has zero quantity")]
    ZeroQuantity(usize),

    /// A persisted line had an invalid product (index, reason).
    #[error("persisted item {0} is invalid: {1}")]
    InvalidProduct(usize, #[source] ProductError),

    /// The persisted lines did not form a valid cart.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Persisted shape of a line item.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedLineItem {
    product_id: String,
    name: String,
    #[serde(default)]
    image_ref: String,
    unit_price: Decimal,
    #[serde(default)]
    available_inventory: u32,
    quantity: u32,
}

impl From<&LineItem> for PersistedLineItem {
    fn from(item: &LineItem) -> Self {
        let product = item.product();

        Self {
            product_id: product.id().to_string(),
            name: product.name().to_string(),
            image_ref: product.image().to_string(),
            unit_price: product.unit_price(),
            available_inventory: product.available_inventory(),
            quantity: item.quantity(),
        }
    }
}

impl PersistedLineItem {
    fn into_line_item(self, idx: usize) -> Result<LineItem, PersistenceError> {
        let quantity = NonZeroU32::new(self.quantity).ok_or(PersistenceError::ZeroQuantity(idx))?;

        let product = Product::new(self.product_id, self.name, self.unit_price)
            .map_err(|error| PersistenceError::InvalidProduct(idx, error))?
            .with_image(self.image_ref)
            .with_inventory(self.available_inventory);

        Ok(LineItem::new(product, quantity))
    }
}

/// Serialize a cart's lines into the persisted JSON layout.
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, PersistenceError> {
    let items: Vec<PersistedLineItem> = cart.iter().map(PersistedLineItem::from).collect();

    serde_json::to_string(&items).map_err(PersistenceError::Encode)
}

/// Parse and validate the persisted JSON layout into a cart.
///
/// # Errors
///
/// Returns a [`PersistenceError`] if the JSON is malformed or any line is invalid.
pub fn decode(raw: &str, currency: &'static Currency) -> Result<Cart, PersistenceError> {
    let items: Vec<PersistedLineItem> =
        serde_json::from_str(raw).map_err(PersistenceError::Decode)?;

    let items = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| item.into_line_item(idx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cart::with_items(items, currency)?)
}

/// Saves and loads a cart in one slot of a key-value store.
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
    currency: &'static Currency,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Create an adapter using [`DEFAULT_CART_KEY`].
    pub fn new(store: S, currency: &'static Currency) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY, currency)
    }

    /// Create an adapter using a custom slot key.
    pub fn with_key(store: S, key: impl Into<String>, currency: &'static Currency) -> Self {
        Self {
            store,
            key: key.into(),
            currency,
        }
    }

    /// The slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The currency hydrated carts are priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the cart to its slot, logging and swallowing any failure.
    pub fn save(&self, cart: &Cart) {
        if let Err(error) = self.try_save(cart) {
            warn!(key = %self.key, %error, "failed to persist cart; keeping in-memory state");
        }
    }

    /// Write the cart to its slot.
    ///
    /// An empty cart is written as `[]`; the slot is never deleted.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if encoding or the store write fails.
    pub fn try_save(&self, cart: &Cart) -> Result<(), PersistenceError> {
        let raw = encode(cart)?;

        self.store.set(&self.key, &raw)?;

        debug!(key = %self.key, lines = cart.len(), bytes = raw.len(), "persisted cart");

        Ok(())
    }

    /// Read the cart from its slot, falling back to an empty cart on any failure.
    pub fn load(&self) -> Cart {
        match self.try_load() {
            Ok(Some(cart)) => cart,
            Ok(None) => {
                debug!(key = %self.key, "no persisted cart; starting empty");

                Cart::new(self.currency)
            }
            Err(error) => {
                warn!(key = %self.key, %error, "discarding unreadable persisted cart");

                Cart::new(self.currency)
            }
        }
    }

    /// Read the cart from its slot; `None` if the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store read fails or the slot is invalid.
    pub fn try_load(&self) -> Result<Option<Cart>, PersistenceError> {
        self.store
            .get(&self.key)?
            .map(|raw| decode(&raw, self.currency))
            .transpose()
    }
}
