//! Wishlist
//!
//! Saved product ids, persisted under their own key in the same way as the cart.

use rustc_hash::FxHashSet;
use tracing::{debug, error, warn};

use crate::{
    cart::{CartError, Outcome, Rejection},
    catalog::Catalog,
    products::Product,
    storage::{KeyValueStore, get_or_discard},
};

/// Versioned storage key the wishlist is persisted under.
pub const WISHLIST_STORAGE_KEY: &str = "cactusbear_wishlist_v1";

/// Ordered set of saved product ids.
#[derive(Debug)]
pub struct Wishlist<S: KeyValueStore> {
    storage: S,
    key: String,
    ids: Vec<String>,
    dirty: bool,
}

impl<S: KeyValueStore> Wishlist<S> {
    /// Load the wishlist from [`WISHLIST_STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the storage cannot be read.
    pub fn init(storage: S) -> Result<Self, CartError> {
        Self::with_key(storage, WISHLIST_STORAGE_KEY)
    }

    /// Load the wishlist from a custom key.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the storage cannot be read.
    pub fn with_key(storage: S, key: impl Into<String>) -> Result<Self, CartError> {
        let key = key.into();

        let mut ids: Vec<String> = match get_or_discard(&storage, &key)? {
            Some(payload) => serde_json::from_str(&payload).unwrap_or_else(|err| {
                warn!(key = %key, error = %err, "discarding unreadable wishlist payload");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let mut seen = FxHashSet::default();
        ids.retain(|id| !id.is_empty() && seen.insert(id.clone()));

        Ok(Self {
            storage,
            key,
            ids,
            dirty: false,
        })
    }

    /// Save `product_id` if absent, otherwise remove it.
    pub fn toggle(&mut self, product_id: &str) -> Outcome {
        let product_id = product_id.trim();

        if product_id.is_empty() {
            return Outcome::Rejected(Rejection::MissingProductId);
        }

        if let Some(index) = self.ids.iter().position(|id| id == product_id) {
            self.ids.remove(index);
            debug!(product_id, "removed from wishlist");
        } else {
            self.ids.push(product_id.to_string());
            debug!(product_id, "saved to wishlist");
        }

        self.persist();

        Outcome::Applied
    }

    /// Whether `product_id` is saved.
    pub fn contains(&self, product_id: &str) -> bool {
        let product_id = product_id.trim();

        self.ids.iter().any(|id| id == product_id)
    }

    /// Saved ids in the order they were saved.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of saved ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Saved products still present in `catalog`, in catalog order.
    pub fn saved_items<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Product> {
        catalog
            .iter()
            .filter(|product| self.contains(&product.id))
            .collect()
    }

    /// Whether the last write to storage failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the saved ids to storage.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the ids could not be encoded or written.
    pub fn flush(&mut self) -> Result<(), CartError> {
        self.write()?;
        self.dirty = false;

        Ok(())
    }

    /// Hand back the storage backend, retrying a failed write first.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the retried write fails.
    pub fn close(mut self) -> Result<S, CartError> {
        if self.dirty {
            self.flush()?;
        }

        Ok(self.storage)
    }

    fn write(&mut self) -> Result<(), CartError> {
        let payload = serde_json::to_string(&self.ids)?;
        self.storage.set(&self.key, &payload)?;

        Ok(())
    }

    fn persist(&mut self) {
        match self.write() {
            Ok(()) => self.dirty = false,
            Err(err) => {
                error!(key = %self.key, error = %err, "failed to persist wishlist");
                self.dirty = true;
            }
        }
    }
}
