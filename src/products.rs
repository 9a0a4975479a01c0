//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a product snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// The product identifier was empty or whitespace.
    #[error("product id must not be blank")]
    BlankId,

    /// The unit price was below zero.
    #[error("product {0} has negative unit price {1}")]
    NegativePrice(ProductId, Decimal),
}

/// Opaque product identifier, unique within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Product metadata captured at the moment it is added to a cart.
///
/// The snapshot is display-only: it is never re-synced if the catalog changes later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    image: String,
    unit_price: Decimal,
    available_inventory: u32,
}

impl Product {
    /// Creates a product snapshot with no image and no advertised inventory.
    ///
    /// # Errors
    ///
    /// - [`ProductError::BlankId`]: the identifier is empty.
    /// - [`ProductError::NegativePrice`]: the unit price is below zero.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<Self, ProductError> {
        let id = id.into();

        if id.is_blank() {
            return Err(ProductError::BlankId);
        }

        if unit_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(id, unit_price));
        }

        Ok(Self {
            id,
            name: name.into(),
            image: String::new(),
            unit_price,
            available_inventory: 0,
        })
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the advisory inventory ceiling.
    #[must_use]
    pub fn with_inventory(mut self, available_inventory: u32) -> Self {
        self.available_inventory = available_inventory;
        self
    }

    /// Returns the product identifier.
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the image reference, empty when the product has none.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Returns the unit price in major units.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the advisory inventory ceiling.
    pub fn available_inventory(&self) -> u32 {
        self.available_inventory
    }
}
