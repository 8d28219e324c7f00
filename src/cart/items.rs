//! Line items

use serde::{Deserialize, Serialize};

/// Identity of a line item: product, size and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineItemKey<'a> {
    /// Product identifier
    pub product_id: &'a str,

    /// Selected size
    pub size: &'a str,

    /// Selected color
    pub color: &'a str,
}

impl<'a> LineItemKey<'a> {
    /// Create a key from its parts.
    pub fn new(product_id: &'a str, size: &'a str, color: &'a str) -> Self {
        Self {
            product_id,
            size,
            color,
        }
    }
}

/// A cart entry.
///
/// Name, price and image are captured when the line is first added and are
/// never refreshed from the product afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identifier
    pub product_id: String,

    /// Product name at add time
    pub name: String,

    /// Unit price at add time
    pub price: i64,

    /// Resolved image at add time
    pub image: String,

    /// Selected size
    pub size: String,

    /// Selected color
    pub color: String,

    /// Quantity, at least 1
    pub qty: u32,
}

impl LineItem {
    /// The identity triple of this line.
    pub fn key(&self) -> LineItemKey<'_> {
        LineItemKey::new(&self.product_id, &self.size, &self.color)
    }

    /// Whether this line has the given identity.
    pub fn matches(&self, key: &LineItemKey<'_>) -> bool {
        self.key() == *key
    }
}
