//! Cart
//!
//! An ordered collection of line items, unique by product. State changes go through
//! [`reduce`]; everything else on [`Cart`] is a read-only selector.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::{self, PricingError},
    products::ProductId,
};

mod actions;

pub use actions::{CartAction, reduce};

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Two lines share a product (index of the second line, product id).
    #[error("Item {0} duplicates product {1}")]
    DuplicateProduct(usize, ProductId),
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError::DuplicateProduct` if two lines share a product id.
    pub fn with_items(
        items: impl Into<Vec<LineItem>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let earlier = items
                .iter()
                .take(i)
                .any(|other| other.product_id() == item.product_id());

            if earlier {
                Err(CartError::DuplicateProduct(i, item.product_id().clone()))
            } else {
                Ok(())
            }
        })?;

        Ok(Cart { items, currency })
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError::Overflow` if the subtotal cannot be represented in minor units.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        pricing::to_money(pricing::subtotal(&self.items)?, self.currency)
    }

    /// Get the line for a product, if present.
    pub fn get(&self, product: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id() == product)
    }

    /// Whether the cart holds a line for the product.
    pub fn contains(&self, product: &ProductId) -> bool {
        self.get(product).is_some()
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get the number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, product: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product)
    }
}
