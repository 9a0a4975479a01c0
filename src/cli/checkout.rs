use std::io::{self, Write};

use clap::Args;
use hamper::{
    checkout::{CheckoutDetails, ContactDetails, ShippingAddress, WriterSubmitter, checkout},
    pricing::PricingPolicy,
    receipt::write_cart,
    storage::FileStore,
    store::CartStore,
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// Optional phone number
    #[arg(long)]
    phone: Option<String>,

    /// First address line
    #[arg(long)]
    line1: String,

    /// Second address line
    #[arg(long)]
    line2: Option<String>,

    /// City or town
    #[arg(long)]
    city: String,

    /// Postal code
    #[arg(long)]
    postcode: String,

    /// Country
    #[arg(long)]
    country: String,
}

impl From<CheckoutArgs> for CheckoutDetails {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            contact: ContactDetails {
                name: args.name,
                email: args.email,
                phone: args.phone,
            },
            shipping: ShippingAddress {
                line1: args.line1,
                line2: args.line2,
                city: args.city,
                postcode: args.postcode,
                country: args.country,
            },
        }
    }
}

/// Print the cart, hand the order to stdout as JSON and report the reference.
pub(crate) fn run(
    store: &mut CartStore<FileStore>,
    policy: &PricingPolicy,
    args: CheckoutArgs,
) -> Result<(), String> {
    let breakdown = store
        .subtotal()
        .and_then(|subtotal| policy.quote(subtotal))
        .map_err(|error| format!("failed to price cart: {error}"))?;

    write_cart(io::stdout().lock(), store.cart(), &breakdown)
        .map_err(|error| format!("failed to write cart: {error}"))?;

    let submitter = WriterSubmitter::new(io::stdout());

    let confirmation = checkout(store, &submitter, policy, args.into())
        .map_err(|error| format!("checkout failed: {error}"))?;

    writeln!(io::stdout().lock(), "order {} placed", confirmation.reference)
        .map_err(|error| error.to_string())
}
