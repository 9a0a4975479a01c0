//! Items

use std::num::NonZeroU32;

use rust_decimal::Decimal;

use crate::products::{Product, ProductId};

/// One product's presence in a cart, with a quantity that is always at least one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    product: Product,
    quantity: NonZeroU32,
}

impl LineItem {
    /// Creates a new line item for the given product.
    pub fn new(product: Product, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// Returns the product snapshot for this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the product identifier for this line.
    pub fn product_id(&self) -> &ProductId {
        self.product.id()
    }

    /// Returns the quantity of this line.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Returns the unit price captured when the product was added.
    pub fn unit_price(&self) -> Decimal {
        self.product.unit_price()
    }

    /// Returns the line total (`unit_price * quantity`), or `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price()
            .checked_mul(Decimal::from(self.quantity.get()))
    }

    /// Whether the quantity is above the advertised inventory.
    ///
    /// Advisory only: the cart never clamps quantities.
    pub fn exceeds_inventory(&self) -> bool {
        self.quantity.get() > self.product.available_inventory()
    }

    pub(crate) fn increase_by(&mut self, quantity: NonZeroU32) {
        self.quantity = self.quantity.saturating_add(quantity.get());
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn widget() -> Result<Product, crate::products::ProductError> {
        Product::new("widget", "Widget", Decimal::new(1999, 2)).map(|p| p.with_inventory(3))
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() -> TestResult {
        let line = LineItem::new(widget()?, NonZeroU32::new(3).ok_or("zero")?);

        assert_eq!(line.line_total(), Some(Decimal::new(5997, 2)));

        Ok(())
    }

    #[test]
    fn increase_saturates_instead_of_wrapping() -> TestResult {
        let mut line = LineItem::new(widget()?, NonZeroU32::MAX);

        line.increase_by(NonZeroU32::MIN);

        assert_eq!(line.quantity(), u32::MAX);

        Ok(())
    }

    #[test]
    fn exceeds_inventory_is_advisory() -> TestResult {
        let mut line = LineItem::new(widget()?, NonZeroU32::new(3).ok_or("zero")?);

        assert!(!line.exceeds_inventory());

        line.increase_by(NonZeroU32::MIN);

        assert!(line.exceeds_inventory());
        assert_eq!(line.quantity(), 4);

        Ok(())
    }

    #[test]
    fn accessors_delegate_to_product() -> TestResult {
        let line = LineItem::new(widget()?, NonZeroU32::MIN);

        assert_eq!(line.product_id().as_str(), "widget");
        assert_eq!(line.unit_price(), Decimal::new(1999, 2));
        assert_eq!(line.product().name(), "Widget");

        Ok(())
    }
}
