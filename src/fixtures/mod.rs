//! Fixtures
//!
//! YAML catalog sets under `fixtures/`: `catalog/<set>.yml` holds the
//! products, `collections/<set>.yml` and `settings/<set>.yml` are optional.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    collections::CollectionMeta,
    countdown::DropSettings,
    fixtures::products::ProductsFixture,
    products::Product,
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

#[derive(Debug, Deserialize)]
struct CollectionsFixture {
    collections: Vec<CollectionMeta>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Catalog,
    collections: Vec<CollectionMeta>,
    settings: DropSettings,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            collections: Vec::new(),
            settings: DropSettings::default(),
            currency: None,
        }
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from `base_path`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_catalog(name)?
            .load_collections(name)?
            .load_settings(name)?;

        Ok(fixture)
    }

    /// Load products from `catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if two products
    /// share an id, or if the prices use different currencies.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = fs::read_to_string(self.path("catalog", name))?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let (product, currency) = product_fixture.into_product()?;

            if let Some(existing) = self.currency {
                if existing != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            if self.catalog.get(&product.id).is_some() {
                return Err(FixtureError::DuplicateProduct(product.id));
            }

            self.catalog.insert(product);
        }

        Ok(self)
    }

    /// Load collections from `collections/<name>.yml`, if present
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_collections(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        if let Some(contents) = read_optional(&self.path("collections", name))? {
            let fixture: CollectionsFixture = serde_norway::from_str(&contents)?;
            self.collections = fixture.collections;
        }

        Ok(self)
    }

    /// Load drop settings from `settings/<name>.yml`, if present
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_settings(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        if let Some(contents) = read_optional(&self.path("settings", name))? {
            self.settings = serde_norway::from_str(&contents)?;
        }

        Ok(self)
    }

    /// Get a product by id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Product, FixtureError> {
        self.catalog
            .get(id)
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Loaded collections
    pub fn collections(&self) -> &[CollectionMeta] {
        &self.collections
    }

    /// Loaded drop settings
    pub fn settings(&self) -> &DropSettings {
        &self.settings
    }

    /// Currency shared by the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn path(&self, category: &str, name: &str) -> PathBuf {
        self.base_path.join(category).join(format!("{name}.yml"))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, FixtureError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
