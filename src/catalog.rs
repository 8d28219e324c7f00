//! Catalog
//!
//! Read-side view of the product documents: lookup by id plus the filters the
//! store and collection pages apply.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::products::{Product, ProductVariant};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// In-memory product catalog, iterated in insertion order.
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    order: Vec<ProductKey>,
    keys: FxHashMap<String, ProductKey>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product, replacing any product with the same id in place.
    pub fn insert(&mut self, product: Product) -> ProductKey {
        if let Some(&key) = self.keys.get(&product.id)
            && let Some(existing) = self.products.get_mut(key)
        {
            *existing = product;
            return key;
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.order.push(key);
        self.keys.insert(id, key);

        key
    }

    /// Remove a product by id.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let key = self.keys.remove(id)?;

        self.order.retain(|existing| *existing != key);
        self.products.remove(key)
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.keys.get(id).and_then(|key| self.products.get(*key))
    }

    /// Look up a product by key.
    pub fn get_by_key(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Products newest first by creation time; products without one sort last.
    pub fn newest_first(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.iter().collect();

        products.sort_by_key(|product| Reverse(product.created_at.unwrap_or(0)));

        products
    }

    /// Products whose collection slug contains `slug`, ignoring case.
    pub fn in_collection(&self, slug: &str) -> Vec<&Product> {
        let slug = slug.to_lowercase();

        self.iter()
            .filter(|product| product.collection_slug.to_lowercase().contains(&slug))
            .collect()
    }

    /// Products that are not locked.
    pub fn purchasable(&self) -> Vec<&Product> {
        self.iter().filter(|product| !product.locked).collect()
    }

    /// The variant shown for `color`, falling back to the first one.
    pub fn active_variant(product: &Product, color: &str) -> Option<ProductVariant> {
        let variants = product.display_variants();

        variants
            .iter()
            .find(|variant| variant.color_name == color)
            .or_else(|| variants.first())
            .cloned()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Self::new();

        for product in iter {
            catalog.insert(product);
        }

        catalog
    }
}
