//! End-to-end cart sessions against a file-backed slot.
//!
//! Each test plays one customer journey: products come from the storefront catalog,
//! every mutation is written to disk, and a fresh store hydrated from the same directory
//! stands in for the customer returning later.

use std::{cell::Cell, fs, path::Path};

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::GBP};
use tempfile::tempdir;
use testresult::TestResult;

use hamper::prelude::*;

fn catalog() -> TestResult<Catalog> {
    Ok(Catalog::load(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/products/storefront.yml"),
    )?)
}

fn open(dir: &Path) -> CartStore<FileStore> {
    CartStore::hydrate(CartPersistence::new(FileStore::new(dir), GBP))
}

fn policy() -> PricingPolicy {
    PricingPolicy::new(
        ShippingPolicy::Flat(Money::from_minor(4_99, GBP)),
        Percentage::from(0.2),
    )
}

fn details() -> CheckoutDetails {
    CheckoutDetails {
        contact: ContactDetails {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: Some("+44 20 7946 0000".to_string()),
        },
        shipping: ShippingAddress {
            line1: "7 Compiler Row".to_string(),
            line2: None,
            city: "Bristol".to_string(),
            postcode: "BS1 4DJ".to_string(),
            country: "GB".to_string(),
        },
    }
}

/// Submitter that fails a fixed number of times before accepting.
struct FlakySubmitter {
    failures_left: Cell<u32>,
}

impl OrderSubmitter for FlakySubmitter {
    fn submit(&self, order: &OrderSubmission) -> Result<OrderConfirmation, SubmissionError> {
        let left = self.failures_left.get();

        if left > 0 {
            self.failures_left.set(left - 1);

            return Err(SubmissionError::Rejected("gateway unavailable".to_string()));
        }

        Ok(OrderConfirmation {
            reference: order.reference,
        })
    }
}

#[test]
fn returning_customer_sees_their_cart() -> TestResult {
    let dir = tempdir()?;
    let catalog = catalog()?;

    {
        let mut store = open(dir.path());

        store.add_one(catalog.product("enamel-mug")?.clone());
        store.add_item(catalog.product("linen-napkins")?.clone(), 2);
        store.set_quantity(&ProductId::from("enamel-mug"), 3);
    }

    let store = open(dir.path());

    assert_eq!(store.total_item_count(), 5);
    assert_eq!(store.subtotal()?, Money::from_minor(90_00, GBP));

    let ids: Vec<&str> = store
        .items()
        .iter()
        .map(|item| item.product_id().as_str())
        .collect();

    assert_eq!(ids, ["enamel-mug", "linen-napkins"]);

    Ok(())
}

#[test]
fn successful_checkout_empties_cart_on_disk() -> TestResult {
    let dir = tempdir()?;
    let catalog = catalog()?;
    let mut store = open(dir.path());

    store.add_item(catalog.product("oak-board")?.clone(), 1);
    store.add_item(catalog.product("beeswax-candle")?.clone(), 2);

    let submitter = WriterSubmitter::new(Vec::new());
    let confirmation = checkout(&mut store, &submitter, &policy(), details())?;

    let order: OrderSubmission = serde_json::from_slice(&submitter.into_inner())?;

    assert_eq!(order.reference, confirmation.reference);
    assert_eq!(order.lines.len(), 2);
    // 42.50 + 2 * 8.99 = 60.48; tax 12.096 -> 12.10
    assert_eq!(order.totals.subtotal, 60_48);
    assert_eq!(order.totals.tax, 12_10);
    assert_eq!(order.totals.total, 60_48 + 4_99 + 12_10);

    assert!(store.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("cart.json"))?, "[]");
    assert!(open(dir.path()).is_empty());

    Ok(())
}

#[test]
fn failed_checkout_keeps_cart_for_retry() -> TestResult {
    let dir = tempdir()?;
    let catalog = catalog()?;
    let mut store = open(dir.path());

    store.add_item(catalog.product("enamel-mug")?.clone(), 2);

    let before = fs::read_to_string(dir.path().join("cart.json"))?;
    let submitter = FlakySubmitter {
        failures_left: Cell::new(1),
    };

    let result = checkout(&mut store, &submitter, &policy(), details());

    assert!(
        matches!(result, Err(CheckoutError::Submission(_))),
        "expected submission failure, got {result:?}"
    );
    assert_eq!(store.total_item_count(), 2);
    assert_eq!(fs::read_to_string(dir.path().join("cart.json"))?, before);
    assert_eq!(open(dir.path()).total_item_count(), 2);

    checkout(&mut store, &submitter, &policy(), details())?;

    assert!(store.is_empty());

    Ok(())
}

#[test]
fn corrupt_slot_starts_empty_and_recovers() -> TestResult {
    let dir = tempdir()?;

    fs::write(dir.path().join("cart.json"), "{not json")?;

    let mut store = open(dir.path());

    assert!(store.is_empty());
    assert_eq!(store.total_item_count(), 0);

    store.add_one(catalog()?.product("beeswax-candle")?.clone());

    assert_eq!(open(dir.path()).total_item_count(), 1);

    Ok(())
}

#[test]
fn slot_written_by_hand_is_validated() -> TestResult {
    let dir = tempdir()?;

    fs::write(
        dir.path().join("cart.json"),
        r#"[{"productId":"A","name":"Widget","unitPrice":"20.00","quantity":0}]"#,
    )?;

    assert!(open(dir.path()).is_empty());

    fs::write(
        dir.path().join("cart.json"),
        r#"[{"productId":"A","name":"Widget","unitPrice":20,"quantity":2}]"#,
    )?;

    let store = open(dir.path());

    assert_eq!(store.total_item_count(), 2);
    assert_eq!(store.subtotal()?, Money::from_minor(40_00, GBP));

    Ok(())
}

#[test]
fn separate_keys_hold_separate_carts() -> TestResult {
    let dir = tempdir()?;
    let catalog = catalog()?;

    let mut guest = CartStore::hydrate(CartPersistence::with_key(
        FileStore::new(dir.path()),
        "guest-cart",
        GBP,
    ));
    let mut member = open(dir.path());

    guest.add_item(catalog.product("oak-board")?.clone(), 1);
    member.add_item(catalog.product("enamel-mug")?.clone(), 4);

    assert!(dir.path().join("guest-cart.json").is_file());
    assert_eq!(open(dir.path()).total_item_count(), 4);

    Ok(())
}
