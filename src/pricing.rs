//! Pricing
//!
//! Turns a cart subtotal into shipping, tax and a grand total.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount could not be represented in minor units.
    #[error("amount overflowed while pricing")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Sums `unit_price * quantity` over the given lines, in major units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum cannot be represented.
pub fn subtotal(items: &[LineItem]) -> Result<Decimal, PricingError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        item.line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or(PricingError::Overflow)
    })
}

/// Converts a major-unit amount into money, rounding half away from zero to the minor unit.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Calculate the percentage of a minor unit amount, rounded half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

/// How shipping is charged for a non-empty cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShippingPolicy {
    /// Shipping is always free.
    Free,

    /// A flat fee per order.
    Flat(Money<'static, Currency>),

    /// A flat fee, waived when the subtotal reaches the threshold.
    FreeOver {
        /// Subtotal at or above which shipping is free.
        threshold: Money<'static, Currency>,

        /// Fee charged below the threshold.
        fee: Money<'static, Currency>,
    },
}

impl ShippingPolicy {
    /// Shipping fee for the given subtotal. Empty carts are never charged.
    pub fn fee_for(&self, subtotal: Money<'static, Currency>) -> Money<'static, Currency> {
        let zero = Money::from_minor(0, subtotal.currency());

        if subtotal.to_minor_units() <= 0 {
            return zero;
        }

        match *self {
            Self::Free => zero,
            Self::Flat(fee) => fee,
            Self::FreeOver { threshold, fee } => {
                if subtotal.to_minor_units() >= threshold.to_minor_units() {
                    zero
                } else {
                    fee
                }
            }
        }
    }
}

/// Shipping and tax rules applied on top of a cart subtotal.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    shipping: ShippingPolicy,
    tax_rate: Percentage,
}

impl PricingPolicy {
    /// Creates a new pricing policy.
    pub fn new(shipping: ShippingPolicy, tax_rate: Percentage) -> Self {
        Self { shipping, tax_rate }
    }

    /// Returns the shipping policy.
    pub fn shipping(&self) -> &ShippingPolicy {
        &self.shipping
    }

    /// Returns the tax rate as a fraction (e.g. `0.2` for 20%).
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Price a subtotal: `total = subtotal + shipping + subtotal * tax_rate`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::PercentConversion`]: the tax amount could not be represented.
    /// - [`PricingError::Money`]: the shipping fee is in a different currency.
    pub fn quote(
        &self,
        subtotal: Money<'static, Currency>,
    ) -> Result<PriceBreakdown, PricingError> {
        let currency = subtotal.currency();
        let shipping = self.shipping.fee_for(subtotal);
        let tax = Money::from_minor(
            percent_of_minor(&self.tax_rate, subtotal.to_minor_units())?,
            currency,
        );

        let total = subtotal.add(shipping)?.add(tax)?;

        Ok(PriceBreakdown {
            subtotal,
            shipping,
            tax,
            total,
        })
    }
}

/// Subtotal, shipping, tax and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    /// Sum of line totals before shipping and tax.
    pub subtotal: Money<'static, Currency>,

    /// Shipping fee.
    pub shipping: Money<'static, Currency>,

    /// Tax on the subtotal.
    pub tax: Money<'static, Currency>,

    /// Amount payable.
    pub total: Money<'static, Currency>,
}
