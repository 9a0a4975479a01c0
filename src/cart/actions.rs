//! Cart state transitions.

use std::num::NonZeroU32;

use crate::{
    cart::Cart,
    items::LineItem,
    products::{Product, ProductId},
};

/// A requested change to a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// A zero quantity leaves the cart unchanged.
    Add {
        /// Product snapshot used when the product is not in the cart yet.
        product: Product,

        /// Quantity to add.
        quantity: u32,
    },

    /// Overwrite the quantity of an existing line; zero or below removes it.
    ///
    /// Unknown products are ignored rather than inserted.
    SetQuantity {
        /// Product to update.
        product: ProductId,

        /// New absolute quantity.
        quantity: i64,
    },

    /// Remove a line, if present.
    Remove {
        /// Product to remove.
        product: ProductId,
    },

    /// Remove every line.
    Clear,
}

impl CartAction {
    /// Short name of the action, used in logs.
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::SetQuantity { .. } => "set_quantity",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
        }
    }
}

/// Apply an action to a cart, returning the next state.
///
/// This has no side effects; persisting the result is the caller's job.
#[must_use]
pub fn reduce(mut cart: Cart, action: CartAction) -> Cart {
    match action {
        CartAction::Add { product, quantity } => {
            if let Some(quantity) = NonZeroU32::new(quantity) {
                add(&mut cart, product, quantity);
            }
        }
        CartAction::SetQuantity { product, quantity } => {
            set_quantity(&mut cart, &product, quantity);
        }
        CartAction::Remove { product } => remove(&mut cart, &product),
        CartAction::Clear => cart.items.clear(),
    }

    cart
}

fn add(cart: &mut Cart, product: Product, quantity: NonZeroU32) {
    match cart.position(product.id()) {
        Some(idx) => {
            if let Some(line) = cart.items.get_mut(idx) {
                line.increase_by(quantity);
            }
        }
        None => cart.items.push(LineItem::new(product, quantity)),
    }
}

fn set_quantity(cart: &mut Cart, product: &ProductId, quantity: i64) {
    let Some(idx) = cart.position(product) else {
        return;
    };

    let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

    match NonZeroU32::new(quantity) {
        Some(quantity) => {
            if let Some(line) = cart.items.get_mut(idx) {
                line.set_quantity(quantity);
            }
        }
        None => {
            cart.items.remove(idx);
        }
    }
}

fn remove(cart: &mut Cart, product: &ProductId) {
    cart.items.retain(|item| item.product_id() != product);
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, minor: i64) -> TestResult<Product> {
        Ok(Product::new(id, id.to_uppercase(), Decimal::new(minor, 2))?)
    }

    fn add_action(id: &str, minor: i64, quantity: u32) -> TestResult<CartAction> {
        Ok(CartAction::Add {
            product: product(id, minor)?,
            quantity,
        })
    }

    fn set_action(id: &str, quantity: i64) -> CartAction {
        CartAction::SetQuantity {
            product: ProductId::from(id),
            quantity,
        }
    }

    fn quantity_of(cart: &Cart, id: &str) -> Option<u32> {
        cart.get(&ProductId::from(id)).map(LineItem::quantity)
    }

    #[test]
    fn repeated_adds_merge_into_one_line() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 100, 2)?);
        let cart = reduce(cart, add_action("p", 100, 3)?);

        assert_eq!(cart.len(), 1);
        assert_eq!(quantity_of(&cart, "p"), Some(5));

        Ok(())
    }

    #[test]
    fn merge_keeps_original_snapshot() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 100, 1)?);

        let repriced = Product::new("p", "Renamed", Decimal::new(999, 2))?;
        let cart = reduce(
            cart,
            CartAction::Add {
                product: repriced,
                quantity: 1,
            },
        );

        let line = cart.get(&ProductId::from("p")).ok_or("missing line")?;

        assert_eq!(line.product().name(), "P");
        assert_eq!(line.unit_price(), Decimal::new(100, 2));
        assert_eq!(line.quantity(), 2);

        Ok(())
    }

    #[test]
    fn add_zero_is_a_no_op() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 100, 0)?);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_line() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 100, 1)?);
        let cart = reduce(cart, set_action("p", 0));

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_negative_removes_line() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 100, 4)?);
        let cart = reduce(cart, set_action("p", -3));

        assert_eq!(cart.len(), 0);

        Ok(())
    }

    #[test]
    fn set_quantity_is_absolute() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 100, 4)?);
        let cart = reduce(cart, set_action("p", 2));

        assert_eq!(quantity_of(&cart, "p"), Some(2));

        Ok(())
    }

    #[test]
    fn set_quantity_clamps_to_u32() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("p", 1, 1)?);
        let cart = reduce(cart, set_action("p", i64::MAX));

        assert_eq!(quantity_of(&cart, "p"), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_product_is_ignored() -> TestResult {
        let before = reduce(Cart::new(GBP), add_action("p", 100, 1)?);
        let after = reduce(before.clone(), set_action("missing", 7));

        assert_eq!(after, before);

        Ok(())
    }

    #[test]
    fn remove_absent_product_leaves_cart_unchanged() -> TestResult {
        let before = reduce(Cart::new(GBP), add_action("p", 100, 1)?);
        let after = reduce(
            before.clone(),
            CartAction::Remove {
                product: ProductId::from("q"),
            },
        );

        assert_eq!(after, before);

        Ok(())
    }

    #[test]
    fn remove_keeps_order_of_remaining_lines() -> TestResult {
        let mut cart = Cart::new(GBP);

        for id in ["a", "b", "c"] {
            cart = reduce(cart, add_action(id, 100, 1)?);
        }

        let cart = reduce(
            cart,
            CartAction::Remove {
                product: ProductId::from("b"),
            },
        );

        let ids: Vec<&str> = cart.iter().map(|item| item.product_id().as_str()).collect();

        assert_eq!(ids, vec!["a", "c"]);

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("a", 100, 1)?);
        let cart = reduce(cart, add_action("b", 100, 2)?);
        let cart = reduce(cart, CartAction::Clear);

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), GBP);

        Ok(())
    }

    #[test]
    fn typical_flow_totals() -> TestResult {
        let cart = reduce(Cart::new(GBP), add_action("A", 20_00, 1)?);
        let cart = reduce(cart, add_action("B", 15_00, 2)?);
        let cart = reduce(cart, set_action("A", 3));

        assert_eq!(cart.total_item_count(), 5);
        assert_eq!(cart.subtotal()?, Money::from_minor(90_00, GBP));

        Ok(())
    }

    #[test]
    fn item_count_matches_quantities_after_mixed_operations() -> TestResult {
        let actions = [
            add_action("a", 100, 3)?,
            add_action("b", 250, 1)?,
            set_action("a", 7),
            add_action("c", 5, 9)?,
            CartAction::Remove {
                product: ProductId::from("b"),
            },
            add_action("a", 100, 2)?,
            set_action("c", -1),
            add_action("d", 1, 4)?,
        ];

        let mut cart = Cart::new(GBP);

        for action in actions {
            cart = reduce(cart, action);

            let recomputed: u64 = cart.iter().map(|item| u64::from(item.quantity())).sum();

            assert_eq!(cart.total_item_count(), recomputed);
            assert!(cart.iter().all(|item| item.quantity() >= 1));
        }

        assert_eq!(quantity_of(&cart, "a"), Some(9));
        assert_eq!(quantity_of(&cart, "d"), Some(4));
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn action_names() -> TestResult {
        assert_eq!(add_action("a", 1, 1)?.to_str(), "add");
        assert_eq!(set_action("a", 1).to_str(), "set_quantity");
        assert_eq!(CartAction::Clear.to_str(), "clear");

        Ok(())
    }
}
