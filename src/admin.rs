//! Admin
//!
//! Parsing and validation behind the catalog console: comma lists, the
//! `Color | url1, url2` variant format, loose price text and `datetime-local`
//! values.

use std::str::FromStr;

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::products::ProductVariant;

pub mod forms;

pub use forms::{
    CollectionForm, CollectionFormError, ProductDraft, ProductForm, ProductFormError, TimerForm,
    TimerFormError,
};

/// Format of an HTML `datetime-local` input value.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Split on commas, trimming entries and dropping empty ones.
pub fn parse_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse loosely formatted price text such as `₦25,000`.
///
/// Everything except digits and `.` is ignored and the result is rounded to
/// whole units. Text that still does not parse is `0`.
pub fn parse_price(s: &str) -> i64 {
    let digits: String = s
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();

    Decimal::from_str(&digits)
        .ok()
        .and_then(|amount| {
            amount
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .unwrap_or(0)
}

/// Parse one variant per line in the form `Color | url1, url2`.
///
/// Lines without a `|`, without a color, or without any image are skipped.
pub fn parse_variants(text: &str) -> Vec<ProductVariant> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut parts = line.split('|').map(str::trim);
            let color_name = parts.next()?;
            let images = parse_csv(parts.next()?);

            if color_name.is_empty() || images.is_empty() {
                return None;
            }

            Some(ProductVariant::new(color_name, images))
        })
        .collect()
}

/// Render variants back into the editable line format.
pub fn variants_to_text(variants: &[ProductVariant]) -> String {
    variants
        .iter()
        .map(|variant| format!("{} | {}", variant.color_name, variant.images.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a `datetime-local` value in `tz` to milliseconds since the epoch.
///
/// Blank or invalid values are `0`.
pub fn datetime_local_to_ms(value: &str, tz: &TimeZone) -> i64 {
    let value = value.trim();

    if value.is_empty() {
        return 0;
    }

    DateTime::strptime(DATETIME_LOCAL_FORMAT, value)
        .and_then(|datetime| datetime.to_zoned(tz.clone()))
        .map_or(0, |zoned| zoned.timestamp().as_millisecond())
}

/// Convert milliseconds since the epoch to a `datetime-local` value in `tz`.
///
/// `0` and out-of-range values are the empty string.
pub fn ms_to_datetime_local(ms: i64, tz: &TimeZone) -> String {
    if ms == 0 {
        return String::new();
    }

    Timestamp::from_millisecond(ms).map_or_else(
        |_err| String::new(),
        |timestamp| {
            timestamp
                .to_zoned(tz.clone())
                .strftime(DATETIME_LOCAL_FORMAT)
                .to_string()
        },
    )
}
