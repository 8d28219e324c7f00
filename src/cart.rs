//! Cart
//!
//! The shopping cart ledger. Line items are keyed by product, size and color;
//! adding the same triple again increments the existing line. The line list is
//! rehydrated from a [`KeyValueStore`] when the store is created and written
//! back after every mutation that takes effect. The drawer flag is UI state
//! only and is never persisted.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    pricing::{PricingError, subtotal},
    products::Product,
    storage::{KeyValueStore, StorageError, get_or_discard},
};

pub mod items;

pub use items::{LineItem, LineItemKey};

/// Versioned storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cactusbear_store_v1";

/// Errors from persisting the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The line items could not be encoded.
    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a cart operation had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The product has no identifier.
    #[error("product has no id")]
    MissingProductId,

    /// The product is locked and cannot be bought.
    #[error("product is locked")]
    LockedProduct,

    /// The size was empty after trimming.
    #[error("size is empty")]
    EmptySize,

    /// The color was empty after trimming.
    #[error("color is empty")]
    EmptyColor,

    /// No line item matches the given product, size and color.
    #[error("no matching line item")]
    NotFound,
}

/// Result of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The cart changed.
    Applied,

    /// The cart was left untouched.
    Rejected(Rejection),
}

impl Outcome {
    /// Whether the operation took effect.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The reason the operation had no effect, if it was rejected.
    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Self::Applied => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Options for [`CartStore::add_to_cart`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddToCart {
    /// Selected size, trimmed before use
    pub size: String,

    /// Selected color, trimmed before use
    pub color: String,

    /// Image to store instead of the one resolved from the product
    pub image: Option<String>,
}

impl AddToCart {
    /// Select a size and color.
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
            image: None,
        }
    }

    /// Override the image stored on a new line.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Clamp a requested quantity to a whole number of at least 1.
///
/// Missing and non-finite requests count as 1.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is a whole number clamped to the u32 range"
)]
pub fn clamp_quantity(next_qty: Option<f64>) -> u32 {
    match next_qty {
        Some(qty) if qty.is_finite() => qty.floor().clamp(1.0, f64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

/// Single-writer cart ledger backed by a key-value store.
#[derive(Debug)]
pub struct CartStore<S: KeyValueStore> {
    storage: S,
    key: String,
    items: Vec<LineItem>,
    is_open: bool,
    dirty: bool,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store under [`CART_STORAGE_KEY`], rehydrating saved lines.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the storage cannot be read.
    pub fn init(storage: S) -> Result<Self, CartError> {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Create a store persisted under a custom key.
    ///
    /// A payload that cannot be read as text or decoded is discarded and the
    /// cart starts empty. It stays in storage until the next write.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the storage cannot be read.
    pub fn with_key(storage: S, key: impl Into<String>) -> Result<Self, CartError> {
        let key = key.into();

        let items = match get_or_discard(&storage, &key)? {
            Some(payload) => decode_items(&key, &payload),
            None => Vec::new(),
        };

        debug!(key = %key, lines = items.len(), "cart rehydrated");

        Ok(Self {
            storage,
            key,
            items,
            is_open: false,
            dirty: false,
        })
    }

    /// Add one unit of `product` in the selected size and color.
    ///
    /// Rejected when the product has no id, is locked, or the size or color is
    /// blank. An existing line for the same triple has its quantity bumped and
    /// keeps its original snapshot; otherwise a new line is appended. Opens the
    /// drawer when applied.
    pub fn add_to_cart(&mut self, product: &Product, opts: &AddToCart) -> Outcome {
        let size = opts.size.trim();
        let color = opts.color.trim();

        let guard = if product.id.trim().is_empty() {
            Some(Rejection::MissingProductId)
        } else if product.locked {
            Some(Rejection::LockedProduct)
        } else if size.is_empty() {
            Some(Rejection::EmptySize)
        } else if color.is_empty() {
            Some(Rejection::EmptyColor)
        } else {
            None
        };

        if let Some(reason) = guard {
            debug!(product_id = %product.id, size, color, %reason, "add to cart rejected");
            return Outcome::Rejected(reason);
        }

        let key = LineItemKey::new(&product.id, size, color);

        if let Some(existing) = self.items.iter_mut().find(|item| item.matches(&key)) {
            existing.qty = existing.qty.saturating_add(1);
            debug!(product_id = %product.id, size, color, qty = existing.qty, "cart line incremented");
        } else {
            let image = opts
                .image
                .as_deref()
                .map(str::trim)
                .filter(|image| !image.is_empty())
                .map_or_else(|| product.resolve_image(color), ToString::to_string);

            self.items.push(LineItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image,
                size: size.to_string(),
                color: color.to_string(),
                qty: 1,
            });
            debug!(product_id = %product.id, size, color, "cart line added");
        }

        self.is_open = true;
        self.persist();

        Outcome::Applied
    }

    /// Remove the line with exactly this product, size and color.
    pub fn remove_from_cart(&mut self, product_id: &str, size: &str, color: &str) -> Outcome {
        let key = LineItemKey::new(product_id, size, color);

        let Some(index) = self.items.iter().position(|item| item.matches(&key)) else {
            debug!(product_id, size, color, "remove from cart found no line");
            return Outcome::Rejected(Rejection::NotFound);
        };

        self.items.remove(index);
        debug!(product_id, size, color, "cart line removed");
        self.persist();

        Outcome::Applied
    }

    /// Set the quantity of a line, see [`clamp_quantity`].
    pub fn update_qty(
        &mut self,
        product_id: &str,
        size: &str,
        color: &str,
        next_qty: Option<f64>,
    ) -> Outcome {
        let key = LineItemKey::new(product_id, size, color);
        let qty = clamp_quantity(next_qty);

        let Some(item) = self.items.iter_mut().find(|item| item.matches(&key)) else {
            debug!(product_id, size, color, "quantity update found no line");
            return Outcome::Rejected(Rejection::NotFound);
        };

        item.qty = qty;
        debug!(product_id, size, color, qty, "cart quantity set");
        self.persist();

        Outcome::Applied
    }

    /// Remove every line. The drawer flag is left alone.
    pub fn clear_cart(&mut self) -> Outcome {
        self.items.clear();
        debug!("cart cleared");
        self.persist();

        Outcome::Applied
    }

    /// Flip the drawer flag.
    pub fn toggle_cart(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Open the drawer.
    pub fn open_cart(&mut self) {
        self.is_open = true;
    }

    /// Close the drawer.
    pub fn close_cart(&mut self) {
        self.is_open = false;
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by its identity.
    pub fn get(&self, product_id: &str, size: &str, color: &str) -> Option<&LineItem> {
        let key = LineItemKey::new(product_id, size, color);

        self.items.iter().find(|item| item.matches(&key))
    }

    /// Whether the drawer is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }

    /// Sum of line totals in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if a line total overflows.
    pub fn subtotal(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        subtotal(&self.items, currency)
    }

    /// Key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Whether the last write to storage failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the current lines to storage.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the lines could not be encoded or written.
    pub fn flush(&mut self) -> Result<(), CartError> {
        self.write()?;
        self.dirty = false;

        Ok(())
    }

    /// Hand back the storage backend, retrying a failed write first.
    ///
    /// A cart with nothing unsaved is not written again.
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
        let payload = serde_json::to_string(&self.items)?;
        self.storage.set(&self.key, &payload)?;

        Ok(())
    }

    fn persist(&mut self) {
        match self.write() {
            Ok(()) => self.dirty = false,
            Err(err) => {
                error!(key = %self.key, error = %err, "failed to persist cart");
                self.dirty = true;
            }
        }
    }
}

/// Decode persisted lines, restoring the ledger invariants.
///
/// Quantities below 1 are raised to 1 and duplicate triples are merged into
/// the first occurrence.
fn decode_items(key: &str, payload: &str) -> Vec<LineItem> {
    let decoded: Vec<LineItem> = match serde_json::from_str(payload) {
        Ok(items) => items,
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable cart payload");
            return Vec::new();
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(decoded.len());

    for mut item in decoded {
        item.qty = item.qty.max(1);

        if let Some(existing) = items.iter_mut().find(|line| line.matches(&item.key())) {
            warn!(key, product_id = %item.product_id, "merging duplicate cart line");
            existing.qty = existing.qty.saturating_add(item.qty);
        } else {
            items.push(item);
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        products::ProductVariant,
        storage::{FileStore, MemoryStore},
    };

    fn tee() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Cactus Tee".to_string(),
            price: 15_000,
            variants: vec![
                ProductVariant::new("Black", ["b1.jpg"]),
                ProductVariant::new("Red", ["r1.jpg", "r2.jpg"]),
            ],
            ..Product::default()
        }
    }

    fn store() -> CartStore<MemoryStore> {
        CartStore {
            storage: MemoryStore::new(),
            key: CART_STORAGE_KEY.to_string(),
            items: Vec::new(),
            is_open: false,
            dirty: false,
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn first_add_creates_line() {
        let mut cart = store();

        let outcome = cart.add_to_cart(&tee(), &AddToCart::new("M", "Black"));

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(
            cart.items(),
            [LineItem {
                product_id: "p1".to_string(),
                name: "Cactus Tee".to_string(),
                price: 15_000,
                image: "b1.jpg".to_string(),
                size: "M".to_string(),
                color: "Black".to_string(),
                qty: 1,
            }]
        );
    }

    #[test]
    fn repeated_add_merges_into_one_line() {
        let mut cart = store();
        let product = tee();

        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Black")).is_applied());
        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Black")).is_applied());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1", "M", "Black").map(|item| item.qty), Some(2));
    }

    #[test]
    fn different_size_or_color_makes_new_lines() {
        let mut cart = store();
        let product = tee();

        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Black")).is_applied());
        assert!(cart.add_to_cart(&product, &AddToCart::new("L", "Black")).is_applied());
        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Red")).is_applied());

        let keys: Vec<_> = cart
            .items()
            .iter()
            .map(|item| (item.size.as_str(), item.color.as_str()))
            .collect();

        assert_eq!(keys, [("M", "Black"), ("L", "Black"), ("M", "Red")]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn inputs_are_trimmed_before_matching() {
        let mut cart = store();
        let product = tee();

        assert!(cart.add_to_cart(&product, &AddToCart::new(" M ", "Red ")).is_applied());
        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Red")).is_applied());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1", "M", "Red").map(|item| item.qty), Some(2));
        assert_eq!(cart.get("p1", "M", "Red").map(|item| item.image.as_str()), Some("r1.jpg"));
    }

    #[test]
    fn locked_product_is_rejected() {
        let mut cart = store();
        let mut product = tee();
        product.locked = true;

        let outcome = cart.add_to_cart(&product, &AddToCart::new("M", "Black"));

        assert_eq!(outcome, Outcome::Rejected(Rejection::LockedProduct));
        assert!(cart.is_empty());
        assert!(!cart.is_open());
        assert!(cart.storage.is_empty());
    }

    #[test]
    fn missing_id_is_rejected_before_lock() {
        let mut cart = store();
        let mut product = tee();
        product.id = String::new();
        product.locked = true;

        let outcome = cart.add_to_cart(&product, &AddToCart::new("M", "Black"));

        assert_eq!(outcome.rejection(), Some(Rejection::MissingProductId));
    }

    #[test]
    fn blank_size_or_color_is_rejected() {
        let mut cart = store();
        let product = tee();

        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Black")).is_applied());
        let before = cart.items().to_vec();

        assert_eq!(
            cart.add_to_cart(&product, &AddToCart::new("", "Black")),
            Outcome::Rejected(Rejection::EmptySize)
        );
        assert_eq!(
            cart.add_to_cart(&product, &AddToCart::new("M", "  ")),
            Outcome::Rejected(Rejection::EmptyColor)
        );

        assert_eq!(cart.items(), before.as_slice());
    }

    #[test]
    fn explicit_image_overrides_resolution() {
        let mut cart = store();

        let opts = AddToCart::new("M", "Black").with_image("custom.jpg");
        assert!(cart.add_to_cart(&tee(), &opts).is_applied());

        assert_eq!(cart.items().first().map(|item| item.image.as_str()), Some("custom.jpg"));
    }

    #[test]
    fn blank_image_override_is_ignored() {
        let mut cart = store();

        let opts = AddToCart::new("M", "Red").with_image("  ");
        assert!(cart.add_to_cart(&tee(), &opts).is_applied());

        assert_eq!(cart.items().first().map(|item| item.image.as_str()), Some("r1.jpg"));
    }

    #[test]
    fn merge_keeps_original_snapshot() {
        let mut cart = store();
        let mut product = tee();

        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Red")).is_applied());

        product.name = "Renamed".to_string();
        product.price = 99_000;
        product.variants = vec![ProductVariant::new("Red", ["new.jpg"])];

        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Red")).is_applied());

        let item = cart.get("p1", "M", "Red");
        assert_eq!(item.map(|item| item.image.as_str()), Some("r1.jpg"));
        assert_eq!(item.map(|item| item.name.as_str()), Some("Cactus Tee"));
        assert_eq!(item.map(|item| item.price), Some(15_000));
        assert_eq!(item.map(|item| item.qty), Some(2));
    }

    #[test]
    fn add_opens_drawer() {
        let mut cart = store();

        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        assert!(cart.is_open());
    }

    #[test]
    fn drawer_setters() {
        let mut cart = store();

        cart.toggle_cart();
        assert!(cart.is_open());
        cart.toggle_cart();
        assert!(!cart.is_open());
        cart.open_cart();
        assert!(cart.is_open());
        cart.close_cart();
        assert!(!cart.is_open());
    }

    #[test]
    fn remove_is_precise() {
        let mut cart = store();
        let product = tee();

        assert!(cart.add_to_cart(&product, &AddToCart::new("M", "Black")).is_applied());
        assert!(cart.add_to_cart(&product, &AddToCart::new("L", "Black")).is_applied());

        assert!(cart.remove_from_cart("p1", "M", "Black").is_applied());

        assert_eq!(cart.len(), 1);
        assert!(cart.get("p1", "L", "Black").is_some());
    }

    #[test]
    fn remove_missing_line_is_not_found() {
        let mut cart = store();

        assert_eq!(
            cart.remove_from_cart("p1", "M", "Black"),
            Outcome::Rejected(Rejection::NotFound)
        );
    }

    #[test]
    fn update_qty_clamps_to_one() {
        let mut cart = store();
        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        for requested in [Some(0.0), Some(-5.0), Some(0.7), Some(f64::NAN), Some(f64::INFINITY), None] {
            assert!(cart.update_qty("p1", "M", "Black", Some(4.0)).is_applied());
            assert!(cart.update_qty("p1", "M", "Black", requested).is_applied());

            assert_eq!(
                cart.get("p1", "M", "Black").map(|item| item.qty),
                Some(1),
                "{requested:?} should clamp to 1"
            );
        }
    }

    #[test]
    fn update_qty_floors_fractions() {
        let mut cart = store();
        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        assert!(cart.update_qty("p1", "M", "Black", Some(3.9)).is_applied());

        assert_eq!(cart.get("p1", "M", "Black").map(|item| item.qty), Some(3));
    }

    #[test]
    fn update_qty_missing_line_is_not_found() {
        let mut cart = store();

        assert_eq!(
            cart.update_qty("p1", "M", "Black", Some(2.0)),
            Outcome::Rejected(Rejection::NotFound)
        );
    }

    #[test]
    fn clear_keeps_drawer_state() {
        let mut cart = store();
        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        assert!(cart.clear_cart().is_applied());

        assert!(cart.is_empty());
        assert!(cart.is_open());
    }

    #[test]
    fn clear_writes_empty_list() -> TestResult {
        let mut cart = store();
        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        assert!(cart.clear_cart().is_applied());

        assert_eq!(cart.storage.get(CART_STORAGE_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn mutations_are_persisted() -> TestResult {
        let mut cart = store();
        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());
        assert!(cart.update_qty("p1", "M", "Black", Some(3.0)).is_applied());

        let storage = cart.close()?;
        let reopened = CartStore::init(storage)?;

        assert_eq!(reopened.get("p1", "M", "Black").map(|item| item.qty), Some(3));
        assert!(!reopened.is_open());

        Ok(())
    }

    #[test]
    fn unreadable_payload_starts_empty() -> TestResult {
        let mut storage = MemoryStore::new();
        storage.set(CART_STORAGE_KEY, "{not json")?;

        let cart = CartStore::init(storage)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn non_utf8_payload_starts_empty_and_is_kept() -> TestResult {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join(format!("{CART_STORAGE_KEY}.json"));
        std::fs::write(&path, [0xff_u8, 0xfe])?;

        let cart = CartStore::init(FileStore::open(dir.path())?)?;

        assert!(cart.is_empty());
        assert!(!cart.is_dirty());

        cart.close()?;

        assert_eq!(std::fs::read(&path)?, [0xff_u8, 0xfe]);

        Ok(())
    }

    #[test]
    fn close_without_changes_does_not_write() -> TestResult {
        let mut storage = MemoryStore::new();
        storage.set(CART_STORAGE_KEY, "{not json")?;

        let storage = CartStore::init(storage)?.close()?;

        assert_eq!(storage.get(CART_STORAGE_KEY)?.as_deref(), Some("{not json"));

        Ok(())
    }

    #[test]
    fn close_retries_failed_write() -> TestResult {
        let mut cart = CartStore::init(FailingStore)?;

        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        assert!(matches!(cart.close(), Err(CartError::Storage(_))));

        Ok(())
    }

    #[test]
    fn rehydration_restores_invariants() -> TestResult {
        let mut storage = MemoryStore::new();
        storage.set(
            CART_STORAGE_KEY,
            r#"[
                {"productId":"p1","name":"Tee","price":1,"image":"","size":"M","color":"Black","qty":0},
                {"productId":"p2","name":"Cap","price":1,"image":"","size":"M","color":"Black","qty":1},
                {"productId":"p1","name":"Tee","price":1,"image":"","size":"M","color":"Black","qty":2}
            ]"#,
        )?;

        let cart = CartStore::init(storage)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("p1", "M", "Black").map(|item| item.qty), Some(3));
        assert_eq!(cart.items().first().map(|item| item.product_id.as_str()), Some("p1"));

        Ok(())
    }

    #[test]
    fn failed_write_marks_dirty_but_applies() -> TestResult {
        let mut cart = CartStore::init(FailingStore)?;

        assert!(cart.add_to_cart(&tee(), &AddToCart::new("M", "Black")).is_applied());

        assert!(cart.is_dirty());
        assert_eq!(cart.len(), 1);
        assert!(matches!(cart.flush(), Err(CartError::Storage(_))));

        Ok(())
    }

    #[test]
    fn clamp_quantity_saturates() {
        assert_eq!(clamp_quantity(Some(1e12)), u32::MAX);
        assert_eq!(clamp_quantity(Some(7.0)), 7);
    }
}
