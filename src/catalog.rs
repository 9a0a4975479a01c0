//! Catalog
//!
//! Product listings loaded from YAML, used to look up what gets added to the cart.

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;
use thiserror::Error;

use crate::products::{Product, ProductError};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The catalog lists no products
    #[error("Catalog has no products; currency unknown")]
    Empty,

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A listing could not be turned into a product
    #[error("Invalid product {0}")]
    Product(String, #[source] ProductError),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: FxHashMap<String, ListingFile>,
}

#[derive(Debug, Deserialize)]
struct ListingFile {
    name: String,

    #[serde(default)]
    image: String,

    price: String,

    #[serde(default)]
    inventory: u32,
}

/// Products available to add to a cart, all priced in one currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: FxHashMap<String, Product>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid, a listing is not a
    /// valid product, prices mix currencies, or there are no products at all.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;

        let mut currency: Option<&'static Currency> = None;
        let mut products = FxHashMap::default();

        for (key, listing) in file.products {
            let (unit_price, listed) = parse_price(&listing.price)?;

            match currency {
                Some(existing) if existing != listed => {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        listed.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(listed),
            }

            let product = Product::new(key.as_str(), listing.name, unit_price)
                .map_err(|error| CatalogError::Product(key.clone(), error))?
                .with_image(listing.image)
                .with_inventory(listing.inventory);

            products.insert(key, product);
        }

        Ok(Self {
            products,
            currency: currency.ok_or(CatalogError::Empty)?,
        })
    }

    /// Get a product by its catalog key.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, CatalogError> {
        self.products
            .get(key)
            .ok_or_else(|| CatalogError::ProductNotFound(key.to_string()))
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products. Always false for a loaded catalog.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Look up a supported currency by ISO code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, CatalogError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(CatalogError::UnknownCurrency(code.to_string())),
    }
}

/// Parse a price string (e.g., "2.99 GBP") into a major-unit amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount
/// is not a decimal, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((amount, currency_from_code(code)?))
}

/// Parse a percentage string (e.g., "20%" or "0.2") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, CatalogError> {
    let trimmed = s.trim();

    let value = match trimmed.strip_suffix('%') {
        Some(percent) => percent
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED),
        None => trimmed.parse::<Decimal>(),
    }
    .map_err(|_err| CatalogError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(value))
}
