//! Hamper
//!
//! Hamper is a persistent shopping cart: a pure reducer over cart lines, a store that
//! mirrors every change into a key-value slot, and the pricing and checkout collaborators
//! that turn a cart into an order.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod items;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod store;
