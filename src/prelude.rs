//! Hamper prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartAction, CartError, reduce},
    catalog::{Catalog, CatalogError},
    checkout::{
        CheckoutDetails, CheckoutError, ContactDetails, OrderConfirmation, OrderSubmission,
        OrderSubmitter, ShippingAddress, SubmissionError, WriterSubmitter, checkout,
    },
    items::LineItem,
    persistence::{CartPersistence, DEFAULT_CART_KEY, PersistenceError},
    pricing::{PriceBreakdown, PricingError, PricingPolicy, ShippingPolicy},
    products::{Product, ProductError, ProductId},
    receipt::{ReceiptError, write_cart},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    store::CartStore,
};
