//! Pricing Config

use clap::Args;
use hamper::{
    catalog::{currency_from_code, parse_percentage},
    pricing::{PricingPolicy, ShippingPolicy, to_money},
};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

/// Shipping and tax settings.
#[derive(Debug, Args)]
pub(crate) struct PricingConfig {
    /// Currency carts are priced in (GBP, USD, EUR)
    #[arg(long, env = "HAMPER_CURRENCY", default_value = "GBP")]
    pub currency: String,

    /// Tax rate as a fraction or percentage ("0.20" or "20%")
    #[arg(long, env = "HAMPER_TAX_RATE", default_value = "0.20")]
    pub tax_rate: String,

    /// Flat shipping fee in major units
    #[arg(long, env = "HAMPER_SHIPPING_FEE", default_value = "4.99")]
    pub shipping_fee: Decimal,

    /// Subtotal at or above which shipping is free
    #[arg(long, env = "HAMPER_FREE_SHIPPING_THRESHOLD")]
    pub free_shipping_threshold: Option<Decimal>,
}

impl PricingConfig {
    /// The configured currency.
    pub(crate) fn currency(&self) -> Result<&'static Currency, String> {
        currency_from_code(&self.currency).map_err(|error| error.to_string())
    }

    /// Build the pricing policy for `currency`.
    pub(crate) fn policy(&self, currency: &'static Currency) -> Result<PricingPolicy, String> {
        let tax_rate = parse_percentage(&self.tax_rate)
            .map_err(|error| format!("invalid tax rate: {error}"))?;

        let fee = to_money(self.shipping_fee, currency)
            .map_err(|error| format!("invalid shipping fee: {error}"))?;

        let shipping = match self.free_shipping_threshold {
            Some(threshold) => ShippingPolicy::FreeOver {
                threshold: to_money(threshold, currency)
                    .map_err(|error| format!("invalid free shipping threshold: {error}"))?,
                fee,
            },
            None if fee.to_minor_units() == 0 => ShippingPolicy::Free,
            None => ShippingPolicy::Flat(fee),
        };

        Ok(PricingPolicy::new(shipping, tax_rate))
    }
}
