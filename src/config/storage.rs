//! Storage Config

use std::path::PathBuf;

use clap::Args;
use hamper::{
    persistence::{CartPersistence, DEFAULT_CART_KEY},
    storage::FileStore,
};
use rusty_money::iso::Currency;

/// Where the cart slot lives.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding persisted carts
    #[arg(long, env = "HAMPER_STORE_DIR", default_value = ".hamper")]
    pub store_dir: PathBuf,

    /// Storage key of the cart slot
    #[arg(long, env = "HAMPER_CART_KEY", default_value = DEFAULT_CART_KEY)]
    pub cart_key: String,
}

impl StorageConfig {
    /// Build the persistence adapter for the configured slot.
    pub(crate) fn persistence(&self, currency: &'static Currency) -> CartPersistence<FileStore> {
        CartPersistence::with_key(
            FileStore::new(&self.store_dir),
            self.cart_key.clone(),
            currency,
        )
    }
}
