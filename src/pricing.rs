//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::LineItem;

/// Errors that can occur while totalling cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total does not fit in the money range.
    #[error("line total overflows for product {0}")]
    Overflow(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Unit price times quantity for one line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the multiplication overflows.
pub fn line_total(
    item: &LineItem,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let amount = item
        .price
        .checked_mul(i64::from(item.qty))
        .ok_or_else(|| PricingError::Overflow(item.product_id.clone()))?;

    Ok(Money::from_major(amount, currency))
}

/// Sum of all line totals. An empty list totals zero.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total overflows.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn subtotal(
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    items
        .iter()
        .try_fold(Money::from_major(0, currency), |acc, item| {
            Ok(acc.add(line_total(item, currency)?)?)
        })
}

/// Unit price as money, for display.
pub fn unit_price(item: &LineItem, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_major(item.price, currency)
}
