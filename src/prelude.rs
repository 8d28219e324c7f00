//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        AddToCart, CART_STORAGE_KEY, CartError, CartStore, LineItem, LineItemKey, Outcome,
        Rejection,
    },
    catalog::{Catalog, ProductKey},
    collections::CollectionMeta,
    countdown::{DropSettings, TimeLeft},
    pricing::PricingError,
    products::{Product, ProductStatus, ProductVariant},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    wishlist::{WISHLIST_STORAGE_KEY, Wishlist},
};
