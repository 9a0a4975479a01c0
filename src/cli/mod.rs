use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use hamper::{
    catalog::Catalog, products::ProductId, receipt::write_cart, storage::FileStore,
    store::CartStore,
};
use tracing::debug;

use crate::config::HamperConfig;

mod checkout;

#[derive(Debug, Parser)]
#[command(name = "hamper", about = "Persistent shopping cart", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub config: HamperConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a catalog product to the cart
    Add(AddArgs),

    /// Set the quantity of a cart line; zero or below removes it
    Set(SetArgs),

    /// Remove a line from the cart
    Remove(RemoveArgs),

    /// Empty the cart
    Clear,

    /// Show the cart with shipping, tax and total
    Show,

    /// Submit the cart as an order
    Checkout(checkout::CheckoutArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Catalog key of the product
    key: String,

    /// Number of units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// YAML product catalog
    #[arg(long, env = "HAMPER_CATALOG")]
    catalog: PathBuf,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Product identifier
    product: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product identifier
    product: String,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        let currency = self.config.pricing.currency()?;
        let mut store = CartStore::hydrate(self.config.storage.persistence(currency));

        debug!(command = ?self.command, "running command");

        match self.command {
            Commands::Add(args) => add(&mut store, &args),
            Commands::Set(args) => set(&mut store, args),
            Commands::Remove(args) => {
                store.remove_item(&ProductId::new(args.product));

                report_count(&store)
            }
            Commands::Clear => {
                store.clear();

                report_count(&store)
            }
            Commands::Show => show(&store, &self.config),
            Commands::Checkout(args) => {
                let policy = self.config.pricing.policy(currency)?;

                checkout::run(&mut store, &policy, args)
            }
        }
    }
}

fn add(store: &mut CartStore<FileStore>, args: &AddArgs) -> Result<(), String> {
    let catalog = Catalog::load(&args.catalog)
        .map_err(|error| format!("failed to load catalog {}: {error}", args.catalog.display()))?;

    let currency = store.persistence().currency();

    if catalog.currency() != currency {
        return Err(format!(
            "catalog is priced in {} but the cart uses {}",
            catalog.currency().iso_alpha_code,
            currency.iso_alpha_code
        ));
    }

    let product = catalog
        .product(&args.key)
        .map_err(|error| error.to_string())?
        .clone();

    store.add_item(product, args.quantity);

    report_count(store)
}

fn set(store: &mut CartStore<FileStore>, args: SetArgs) -> Result<(), String> {
    let product = ProductId::new(args.product);

    if !store.cart().contains(&product) {
        return Err(format!("{product} is not in the cart"));
    }

    store.set_quantity(&product, args.quantity);

    report_count(store)
}

fn show(store: &CartStore<FileStore>, config: &HamperConfig) -> Result<(), String> {
    let policy = config.pricing.policy(store.persistence().currency())?;

    let breakdown = store
        .subtotal()
        .and_then(|subtotal| policy.quote(subtotal))
        .map_err(|error| format!("failed to price cart: {error}"))?;

    write_cart(io::stdout().lock(), store.cart(), &breakdown)
        .map_err(|error| format!("failed to write cart: {error}"))
}

fn report_count(store: &CartStore<FileStore>) -> Result<(), String> {
    writeln!(
        io::stdout().lock(),
        "{} item(s) in cart",
        store.total_item_count()
    )
    .map_err(|error| error.to_string())
}
