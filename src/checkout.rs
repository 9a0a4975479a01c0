//! Checkout
//!
//! Snapshots a cart into an order submission, hands it to an [`OrderSubmitter`], and
//! clears the cart only once the submission is confirmed.

use std::{cell::RefCell, io};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::Cart,
    pricing::{PriceBreakdown, PricingError, PricingPolicy},
    products::ProductId,
    storage::KeyValueStore,
    store::CartStore,
};

/// Errors raised by an order submitter.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The receiving side declined the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The order could not be encoded.
    #[error("failed to encode order")]
    Encode(#[from] serde_json::Error),

    /// The order could not be delivered.
    #[error("failed to deliver order")]
    Io(#[from] io::Error),
}

/// Errors raised during checkout. The cart is left untouched whenever one is returned.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A required checkout field is missing or malformed.
    #[error("invalid checkout details: {0}")]
    InvalidDetails(&'static str),

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The submitter failed; the cart can be submitted again.
    #[error("order submission failed")]
    Submission(#[source] SubmissionError),
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Optional phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// First address line.
    pub line1: String,

    /// Optional second address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    /// City or town.
    pub city: String,

    /// Postal code.
    pub postcode: String,

    /// Country.
    pub country: String,
}

/// Details collected from the customer alongside the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Contact details.
    pub contact: ContactDetails,

    /// Delivery address.
    pub shipping: ShippingAddress,
}

impl CheckoutDetails {
    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidDetails`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            (&self.contact.name, "name"),
            (&self.shipping.line1, "line1"),
            (&self.shipping.city, "city"),
            (&self.shipping.postcode, "postcode"),
            (&self.shipping.country, "country"),
        ];

        if let Some((_, field)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
            return Err(CheckoutError::InvalidDetails(field));
        }

        if !is_plausible_email(&self.contact.email) {
            return Err(CheckoutError::InvalidDetails("email"));
        }

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.trim().split('@');

    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    )
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product identifier.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,
}

/// Order totals in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// ISO currency code.
    pub currency: String,

    /// Sum of line totals.
    pub subtotal: i64,

    /// Shipping fee.
    pub shipping: i64,

    /// Tax.
    pub tax: i64,

    /// Amount payable.
    pub total: i64,
}

impl From<&PriceBreakdown> for OrderTotals {
    fn from(breakdown: &PriceBreakdown) -> Self {
        Self {
            currency: breakdown.subtotal.currency().iso_alpha_code.to_string(),
            subtotal: breakdown.subtotal.to_minor_units(),
            shipping: breakdown.shipping.to_minor_units(),
            tax: breakdown.tax.to_minor_units(),
            total: breakdown.total.to_minor_units(),
        }
    }
}

/// Payload handed to the order submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    /// Client-generated order reference.
    pub reference: Uuid,

    /// When the order was placed.
    pub placed_at: Timestamp,

    /// Ordered products, in cart order.
    pub lines: Vec<OrderLine>,

    /// Contact details.
    pub contact: ContactDetails,

    /// Delivery address.
    pub shipping: ShippingAddress,

    /// Priced totals.
    pub totals: OrderTotals,
}

impl OrderSubmission {
    /// Build a submission from a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart is empty, the details are invalid, or the
    /// cart cannot be priced.
    pub fn from_cart(
        cart: &Cart,
        policy: &PricingPolicy,
        details: CheckoutDetails,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        details.validate()?;

        let breakdown = policy.quote(cart.subtotal()?)?;

        let lines = cart
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id().clone(),
                quantity: item.quantity(),
            })
            .collect();

        Ok(Self {
            reference: Uuid::now_v7(),
            placed_at: Timestamp::now(),
            lines,
            contact: details.contact,
            shipping: details.shipping,
            totals: OrderTotals::from(&breakdown),
        })
    }
}

/// Confirmation returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Reference of the accepted order.
    pub reference: Uuid,
}

/// Delivers an order submission to whatever takes orders.
#[cfg_attr(test, mockall::automock)]
pub trait OrderSubmitter {
    /// Submit the order.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if the order was not accepted.
    fn submit(&self, order: &OrderSubmission) -> Result<OrderConfirmation, SubmissionError>;
}

/// Submitter writing each order as a line of JSON.
#[derive(Debug)]
pub struct WriterSubmitter<W> {
    out: RefCell<W>,
}

impl<W: io::Write> WriterSubmitter<W> {
    /// Create a submitter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Consume the submitter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: io::Write> OrderSubmitter for WriterSubmitter<W> {
    fn submit(&self, order: &OrderSubmission) -> Result<OrderConfirmation, SubmissionError> {
        let mut out = self.out.borrow_mut();

        serde_json::to_writer(&mut *out, order)?;
        writeln!(out)?;
        out.flush()?;

        Ok(OrderConfirmation {
            reference: order.reference,
        })
    }
}

/// Submit the cart as an order, clearing it only if the submitter confirms.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the order could not be built or submitted. The cart is
/// unchanged in every error case so the customer can retry.
pub fn checkout<S, O>(
    store: &mut CartStore<S>,
    submitter: &O,
    policy: &PricingPolicy,
    details: CheckoutDetails,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: KeyValueStore,
    O: OrderSubmitter + ?Sized,
{
    let order = OrderSubmission::from_cart(store.cart(), policy, details)?;

    match submitter.submit(&order) {
        Ok(confirmation) => {
            info!(
                reference = %confirmation.reference,
                lines = order.lines.len(),
                total = order.totals.total,
                "order submitted"
            );

            store.clear();

            Ok(confirmation)
        }
        Err(error) => {
            warn!(reference = %order.reference, %error, "order submission failed; cart kept");

            Err(CheckoutError::Submission(error))
        }
    }
}
