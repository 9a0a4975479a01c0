//! Cart Summary

use std::{fmt::Write, io};

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    items::LineItem,
    pricing::{PriceBreakdown, PricingError, to_money},
};

/// Errors that can occur when writing a cart summary.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line total could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the cart lines followed by subtotal, shipping, tax and total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if a line cannot be priced or the output cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    cart: &Cart,
    breakdown: &PriceBreakdown,
) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();
    let mut low_stock_rows = Vec::new();

    builder.push_record(["", "Item", "Unit Price", "Qty", "Line Total"]);

    for (idx, item) in cart.iter().enumerate() {
        let mut name = item.product().name().to_string();

        if item.exceeds_inventory() {
            low_stock_rows.push(idx + 1);

            _ = write!(
                name,
                "\n{} in stock",
                item.product().available_inventory()
            );
        }

        builder.push_record([
            format!("#{:<3}", idx + 1),
            name,
            format!("{}", to_money(item.unit_price(), cart.currency())?),
            item.quantity().to_string(),
            format!("{}", line_total(item, cart.currency())?),
        ]);
    }

    write_cart_table(&mut out, builder, &low_stock_rows)?;
    write_cart_summary(&mut out, breakdown)
}

fn line_total(
    item: &LineItem,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, ReceiptError> {
    let total = item.line_total().ok_or(PricingError::Overflow)?;

    Ok(to_money(total, currency)?)
}

fn write_cart_table(
    out: &mut impl io::Write,
    builder: Builder,
    low_stock_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Columns::new(2..3), color_dark_grey());

    for &row in low_stock_rows {
        table.modify((row, 1), Color::FG_YELLOW);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_cart_summary(
    out: &mut impl io::Write,
    breakdown: &PriceBreakdown,
) -> Result<(), ReceiptError> {
    let total_val = format!("{}  ", breakdown.total);

    let rows = [
        (" Subtotal:".to_string(), format!("{}  ", breakdown.subtotal)),
        (" Shipping:".to_string(), format!("{}  ", breakdown.shipping)),
        (" Tax:".to_string(), format!("{}  ", breakdown.tax)),
        (
            " \x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{total_val}\x1b[0m"),
        ),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of UTF-8 box-drawing characters (U+2500..U+257F) in ANSI dark-grey
/// escape codes, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char != in_run {
            out.push_str(if box_char { "\x1b[90m" } else { "\x1b[0m" });
            in_run = box_char;
        }

        out.push(ch);
    }

    if in_run {
        out.push_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            in_escape = !ch.is_ascii_alphabetic();
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {:>value_pad$}{value}",
        "", ""
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
