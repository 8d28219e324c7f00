//! Admin forms

use jiff::tz::TimeZone;
use thiserror::Error;

use crate::{
    admin::{
        datetime_local_to_ms, ms_to_datetime_local, parse_csv, parse_price, parse_variants,
        variants_to_text,
    },
    collections::{CollectionMeta, DEFAULT_WALLPAPER},
    countdown::{DEFAULT_DROP_TITLE, DropSettings},
    products::{Product, ProductStatus, ProductVariant},
};

/// Product form validation errors, reported in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductFormError {
    /// Name is blank
    #[error("Product name is required.")]
    MissingName,

    /// Collection slug is blank
    #[error("Collection slug is required (e.g. season-1).")]
    MissingCollection,

    /// Category is blank
    #[error("Category is required.")]
    MissingCategory,

    /// Price did not parse to a positive amount
    #[error("Price must be valid.")]
    InvalidPrice,

    /// No sizes listed
    #[error("Add at least one size (S,M,L...).")]
    NoSizes,

    /// No valid variant lines
    #[error("Add at least one variant line: Black | url1, url2")]
    NoVariants,
}

/// Collection form validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionFormError {
    /// Slug is blank
    #[error("Collection slug is required.")]
    MissingSlug,
}

/// Timer form validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerFormError {
    /// End time is blank or invalid
    #[error("Pick a valid drop end date/time.")]
    InvalidEndTime,
}

/// Raw product form fields as typed by an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    /// Name
    pub name: String,

    /// Price text
    pub price: String,

    /// Category
    pub category: String,

    /// Collection slug
    pub collection_slug: String,

    /// Description
    pub description: String,

    /// Stock status
    pub status: ProductStatus,

    /// Lock flag
    pub locked: bool,

    /// Comma-separated sizes
    pub sizes: String,

    /// Variant lines, `Color | url1, url2`
    pub variants_text: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            category: String::new(),
            collection_slug: "season-1".to_string(),
            description: String::new(),
            status: ProductStatus::InStock,
            locked: false,
            sizes: "S,M,L,XL".to_string(),
            variants_text: String::new(),
        }
    }
}

impl ProductForm {
    /// Prefill the form for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            collection_slug: if product.collection_slug.is_empty() {
                "season-1".to_string()
            } else {
                product.collection_slug.clone()
            },
            description: product.description.clone().unwrap_or_default(),
            status: product.status,
            locked: product.locked,
            sizes: product.sizes.join(", "),
            variants_text: variants_to_text(&product.variants),
        }
    }

    /// Validate the form into a product payload.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a `ProductFormError`.
    pub fn validate(&self) -> Result<ProductDraft, ProductFormError> {
        let name = self.name.trim();
        let price = parse_price(&self.price);
        let category = self.category.trim();
        let collection_slug = self.collection_slug.trim().to_lowercase();
        let sizes = parse_csv(&self.sizes);
        let variants = parse_variants(&self.variants_text);

        if name.is_empty() {
            return Err(ProductFormError::MissingName);
        }

        if collection_slug.is_empty() {
            return Err(ProductFormError::MissingCollection);
        }

        if category.is_empty() {
            return Err(ProductFormError::MissingCategory);
        }

        if price <= 0 {
            return Err(ProductFormError::InvalidPrice);
        }

        if sizes.is_empty() {
            return Err(ProductFormError::NoSizes);
        }

        if variants.is_empty() {
            return Err(ProductFormError::NoVariants);
        }

        let images = variants
            .first()
            .map(|variant| variant.images.clone())
            .unwrap_or_default();
        let colors = variants
            .iter()
            .map(|variant| variant.color_name.clone())
            .collect();

        Ok(ProductDraft {
            name: name.to_string(),
            price,
            category: category.to_string(),
            collection_slug,
            description: self.description.trim().to_string(),
            status: self.status,
            locked: self.locked,
            sizes,
            variants,
            images,
            colors,
        })
    }
}

/// A validated product payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Name
    pub name: String,

    /// Price in whole units, positive
    pub price: i64,

    /// Category
    pub category: String,

    /// Lower-cased collection slug
    pub collection_slug: String,

    /// Description
    pub description: String,

    /// Stock status
    pub status: ProductStatus,

    /// Lock flag
    pub locked: bool,

    /// Sizes
    pub sizes: Vec<String>,

    /// Variants, at least one
    pub variants: Vec<ProductVariant>,

    /// First variant's images
    pub images: Vec<String>,

    /// Variant color names
    pub colors: Vec<String>,
}

impl ProductDraft {
    /// Build a new product document created at `now_ms`.
    pub fn create(self, id: impl Into<String>, now_ms: i64) -> Product {
        let mut product = self.into_product(id.into(), now_ms);
        product.created_at = Some(now_ms);
        product
    }

    /// Apply the draft to an existing product, keeping its id and creation time.
    pub fn update(self, existing: &Product, now_ms: i64) -> Product {
        let mut product = self.into_product(existing.id.clone(), now_ms);
        product.created_at = existing.created_at;
        product
    }

    fn into_product(self, id: String, now_ms: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
            collection_slug: self.collection_slug,
            description: Some(self.description),
            status: self.status,
            locked: self.locked,
            sizes: self.sizes,
            variants: self.variants,
            images: self.images,
            colors: self.colors,
            created_at: None,
            updated_at: Some(now_ms),
        }
    }
}

/// Raw collection form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionForm {
    /// Slug
    pub slug: String,

    /// Display name
    pub name: String,

    /// Wallpaper path
    pub wallpaper: String,

    /// Lock flag
    pub locked: bool,

    /// Unlock time as a `datetime-local` value
    pub unlock_at: String,
}

impl Default for CollectionForm {
    fn default() -> Self {
        Self {
            slug: "season-1".to_string(),
            name: "Season 1".to_string(),
            wallpaper: DEFAULT_WALLPAPER.to_string(),
            locked: false,
            unlock_at: String::new(),
        }
    }
}

impl CollectionForm {
    /// Prefill the form from saved metadata.
    pub fn from_meta(meta: &CollectionMeta, tz: &TimeZone) -> Self {
        Self {
            slug: meta.slug.clone(),
            name: meta.name.clone(),
            wallpaper: meta.wallpaper.clone(),
            locked: meta.locked,
            unlock_at: ms_to_datetime_local(meta.unlock_at, tz),
        }
    }

    /// Validate into collection metadata, id equal to the slug.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionFormError::MissingSlug`] when the slug is blank.
    pub fn validate(&self, tz: &TimeZone) -> Result<CollectionMeta, CollectionFormError> {
        let slug = self.slug.trim().to_lowercase();

        if slug.is_empty() {
            return Err(CollectionFormError::MissingSlug);
        }

        let name = match self.name.trim() {
            "" => slug.clone(),
            name => name.to_string(),
        };

        let wallpaper = match self.wallpaper.trim() {
            "" => DEFAULT_WALLPAPER.to_string(),
            wallpaper => wallpaper.to_string(),
        };

        Ok(CollectionMeta {
            id: slug.clone(),
            slug,
            name,
            wallpaper,
            locked: self.locked,
            unlock_at: datetime_local_to_ms(&self.unlock_at, tz),
        })
    }
}

/// Raw homepage timer form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerForm {
    /// Title
    pub drop_title: String,

    /// End time as a `datetime-local` value
    pub drop_end_at: String,
}

impl TimerForm {
    /// Validate into drop settings.
    ///
    /// # Errors
    ///
    /// Returns [`TimerFormError::InvalidEndTime`] when the end time is blank or invalid.
    pub fn validate(&self, tz: &TimeZone) -> Result<DropSettings, TimerFormError> {
        let drop_end_at = datetime_local_to_ms(&self.drop_end_at, tz);

        if drop_end_at == 0 {
            return Err(TimerFormError::InvalidEndTime);
        }

        let drop_title = match self.drop_title.trim() {
            "" => DEFAULT_DROP_TITLE.to_string(),
            title => title.to_string(),
        };

        Ok(DropSettings {
            drop_title,
            drop_end_at,
        })
    }
}
