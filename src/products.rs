//! Products

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color name used when a product has no variants of its own.
pub const DEFAULT_COLOR: &str = "Default";

/// Size used when a product lists no sizes.
pub const DEFAULT_SIZE: &str = "One Size";

/// Product stock status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    /// Available to buy now
    #[default]
    InStock,

    /// No stock left
    SoldOut,

    /// Can be ordered ahead of the drop
    PreOrder,
}

impl ProductStatus {
    /// Status tag as stored on product documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in-stock",
            Self::SoldOut => "sold-out",
            Self::PreOrder => "pre-order",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color option of a product with its own ordered image set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Color name, unique within a product
    pub color_name: String,

    /// Image references; the first is the thumbnail for this color
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductVariant {
    /// Create a new variant.
    pub fn new(
        color_name: impl Into<String>,
        images: impl IntoIterator<Item: Into<String>>,
    ) -> Self {
        Self {
            color_name: color_name.into(),
            images: images.into_iter().map(Into::into).collect(),
        }
    }

    /// First image of the variant, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    /// Document identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in whole currency units
    pub price: i64,

    /// Category label
    pub category: String,

    /// Collection the product belongs to (e.g. `season-1`)
    pub collection_slug: String,

    /// Free-form description
    pub description: Option<String>,

    /// Stock status
    pub status: ProductStatus,

    /// Locked products can never be added to the cart
    pub locked: bool,

    /// Available sizes
    pub sizes: Vec<String>,

    /// Color variants
    pub variants: Vec<ProductVariant>,

    /// Flat fallback images, usually the first variant's images
    pub images: Vec<String>,

    /// Convenience list of variant color names
    pub colors: Vec<String>,

    /// Creation time in milliseconds since the epoch
    pub created_at: Option<i64>,

    /// Last update time in milliseconds since the epoch
    pub updated_at: Option<i64>,
}

impl Product {
    /// Find the variant with exactly this color name.
    pub fn variant(&self, color: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|variant| variant.color_name == color)
    }

    /// Resolve the thumbnail for a color.
    ///
    /// Tries the matching variant, then the first variant, then the flat image
    /// list, and finally falls back to an empty string.
    pub fn resolve_image(&self, color: &str) -> String {
        self.variant(color)
            .and_then(ProductVariant::thumbnail)
            .or_else(|| self.variants.first().and_then(ProductVariant::thumbnail))
            .or_else(|| self.images.first().map(String::as_str))
            .unwrap_or_default()
            .to_string()
    }

    /// Variants as a product page shows them.
    ///
    /// A product with no variants but some flat images gets a single synthetic
    /// [`DEFAULT_COLOR`] variant.
    pub fn display_variants(&self) -> Vec<ProductVariant> {
        if !self.variants.is_empty() {
            return self.variants.clone();
        }

        if self.images.is_empty() {
            return Vec::new();
        }

        vec![ProductVariant::new(DEFAULT_COLOR, self.images.iter().cloned())]
    }

    /// The color and size preselected on a product page.
    pub fn default_selection(&self) -> (String, String) {
        let color = self
            .display_variants()
            .first()
            .map_or_else(|| DEFAULT_COLOR.to_string(), |variant| variant.color_name.clone());

        let size = self
            .sizes
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SIZE.to_string());

        (color, size)
    }

    /// Whether the buy button is enabled for this product.
    pub fn can_buy(&self) -> bool {
        self.status != ProductStatus::SoldOut
    }
}
