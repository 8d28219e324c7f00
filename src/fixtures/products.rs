//! Product Fixtures

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductStatus, ProductVariant},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Product price (e.g., "45000 NGN")
    pub price: String,

    /// Category
    #[serde(default)]
    pub category: String,

    /// Collection slug
    #[serde(default)]
    pub collection: String,

    /// Stock status
    #[serde(default)]
    pub status: ProductStatus,

    /// Lock flag
    #[serde(default)]
    pub locked: bool,

    /// Sizes
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Variants keyed by color, in order
    #[serde(default)]
    pub variants: Vec<VariantFixture>,

    /// Flat fallback images
    #[serde(default)]
    pub images: Vec<String>,

    /// Creation time in milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Variant Fixture
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Color name
    pub color: String,

    /// Images
    pub images: Vec<String>,
}

impl ProductFixture {
    /// Convert into a product, returning the price currency alongside.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn into_product(self) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let variants: Vec<ProductVariant> = self
            .variants
            .into_iter()
            .map(|variant| ProductVariant::new(variant.color, variant.images))
            .collect();

        let colors = variants
            .iter()
            .map(|variant| variant.color_name.clone())
            .collect();

        let product = Product {
            id: self.id,
            name: self.name,
            price,
            category: self.category,
            collection_slug: self.collection,
            description: None,
            status: self.status,
            locked: self.locked,
            sizes: self.sizes,
            variants,
            images: self.images,
            colors,
            created_at: self.created_at,
            updated_at: self.created_at,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "45000 NGN") into whole units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a whole number, or if the currency code is not a
/// known ISO currency.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = Decimal::from_str(amount)
        .ok()
        .filter(|amount| amount.fract().is_zero())
        .and_then(|amount| amount.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency((*code).to_string()))?;

    Ok((amount, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::NGN;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_whole_price() -> TestResult {
        assert_eq!(parse_price("45000 NGN")?, (45_000, NGN));

        Ok(())
    }

    #[test]
    fn rejects_fractional_and_malformed_prices() {
        assert!(matches!(parse_price("12.50 NGN"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("45000"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("abc NGN"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn rejects_unknown_currency() {
        assert!(matches!(
            parse_price("100 XYZ"),
            Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn fixture_converts_to_product() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(
            "
id: tee
name: Cactus Tee
price: 15000 NGN
status: sold-out
sizes: [M, L]
variants:
  - color: Black
    images: [b1.jpg]
",
        )?;

        let (product, currency) = fixture.into_product()?;

        assert_eq!(currency, NGN);
        assert_eq!(product.price, 15_000);
        assert_eq!(product.status, ProductStatus::SoldOut);
        assert_eq!(product.colors, ["Black"]);
        assert_eq!(product.resolve_image("Black"), "b1.jpg");

        Ok(())
    }
}
