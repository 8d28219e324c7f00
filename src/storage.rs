//! Storage
//!
//! Durable key-value surfaces the stores persist into. A store reads its key
//! once at start-up and writes it back after every mutation.

use std::{io, string::FromUtf8Error};

use thiserror::Error;
use tracing::warn;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backend cannot store.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// IO error reading or writing a value
    #[error("Storage IO error for key {key:?}: {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The stored bytes are not valid UTF-8
    #[error("Stored value for key {key:?} is not valid UTF-8")]
    Corrupt {
        /// Key being read
        key: String,
        /// Decoding error
        #[source]
        source: FromUtf8Error,
    },
}

/// A durable key-value surface.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the value could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read `key`, treating a corrupt value as absent.
///
/// The corrupt value is left in place and logged at `warn`.
///
/// # Errors
///
/// Returns any other `StorageError` from the backend.
pub fn get_or_discard<S: KeyValueStore + ?Sized>(
    storage: &S,
    key: &str,
) -> Result<Option<String>, StorageError> {
    match storage.get(key) {
        Err(err @ StorageError::Corrupt { .. }) => {
            warn!(key, error = %err, "discarding corrupt stored value");
            Ok(None)
        }
        result => result,
    }
}

/// Check that a key only uses `[A-Za-z0-9._-]` and is not empty.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CorruptStore;

    impl KeyValueStore for CorruptStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match String::from_utf8(vec![0xff, 0xfe]) {
                Ok(value) => Ok(Some(value)),
                Err(source) => Err(StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            }
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn corrupt_value_reads_as_absent() {
        assert!(matches!(CorruptStore.get("k"), Err(StorageError::Corrupt { .. })));
        assert!(matches!(get_or_discard(&CorruptStore, "k"), Ok(None)));
    }

    #[test]
    fn versioned_keys_are_valid() {
        assert!(validate_key("cactusbear_store_v1").is_ok());
        assert!(validate_key("storefront.cart-v2").is_ok());
    }

    #[test]
    fn path_like_keys_are_rejected() {
        for key in ["", "../cart", "a/b", ".hidden", "cart v1"] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
