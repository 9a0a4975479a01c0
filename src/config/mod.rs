//! Hamper configuration

use clap::Args;

pub(crate) mod logging;
pub(crate) mod pricing;
pub(crate) mod storage;

pub(crate) use logging::{LogFormat, LoggingConfig};
pub(crate) use pricing::PricingConfig;
pub(crate) use storage::StorageConfig;

/// Settings shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct HamperConfig {
    /// Cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Shipping and tax settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
