//! Receipt
//!
//! Table rendering of the cart lines and subtotal.

use std::io;

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::LineItem,
    pricing::{PricingError, line_total, subtotal, unit_price},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error totalling the cart lines.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart as a table followed by item count and subtotal.
///
/// # Errors
///
/// Returns an error if a line total overflows or the output cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    if items.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Color", "Size", "Unit Price", "Qty", "Total"]);

    for (idx, item) in items.iter().enumerate() {
        builder.push_record([
            (idx + 1).to_string(),
            item.name.clone(),
            item.color.clone(),
            item.size.clone(),
            unit_price(item, currency).to_string(),
            item.qty.to_string(),
            line_total(item, currency)?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    let units: u64 = items.iter().map(|item| u64::from(item.qty)).sum();

    writeln!(out, "\n{table}")?;
    writeln!(out, "\nItems: {units}")?;
    writeln!(out, "Subtotal: {}", subtotal(items, currency)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::NGN;
    use testresult::TestResult;

    use super::*;

    fn line(name: &str, price: i64, qty: u32) -> LineItem {
        LineItem {
            product_id: name.to_lowercase(),
            name: name.to_string(),
            price,
            image: String::new(),
            size: "M".to_string(),
            color: "Black".to_string(),
            qty,
        }
    }

    #[test]
    fn empty_cart_message() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &[], NGN)?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty.\n");

        Ok(())
    }

    #[test]
    fn lists_every_line() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &[line("Hoodie", 45_000, 2), line("Cap", 9_000, 1)], NGN)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Hoodie"), "missing hoodie row: {text}");
        assert!(text.contains("Cap"), "missing cap row: {text}");
        assert!(text.contains("Items: 3"), "missing item count: {text}");
        assert!(text.contains("Subtotal:"), "missing subtotal: {text}");

        Ok(())
    }
}
