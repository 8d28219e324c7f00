//! Storefront
//!
//! Core of a direct-to-consumer apparel storefront: the persisted shopping
//! cart, wishlist, product catalog views, admin form parsing and the homepage
//! drop countdown.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod collections;
pub mod config;
pub mod countdown;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod wishlist;
