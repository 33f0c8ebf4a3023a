//! In-process secret store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::ports::SecretStore;

/// Secret store kept in memory. Used in tests and when the OS keychain is
/// switched off for a run.
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.read().is_empty()
    }
}

impl SecretStore for MemorySecretStore {
    fn store(&self, label: &str, payload: &str) -> Result<String> {
        self.secrets
            .write()
            .insert(label.to_string(), payload.to_string());
        Ok(label.to_string())
    }

    fn find(&self, label: &str) -> Result<String> {
        self.secrets
            .read()
            .get(label)
            .cloned()
            .ok_or_else(|| Error::SecretNotFound(label.to_string()))
    }

    fn delete(&self, label: &str) -> Result<()> {
        self.secrets
            .write()
            .remove(label)
            .map(|_| ())
            .ok_or_else(|| Error::SecretNotFound(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty());

        assert_eq!(store.store("a", "1").unwrap(), "a");
        assert_eq!(store.find("a").unwrap(), "1");

        store.store("a", "2").unwrap();
        assert_eq!(store.find("a").unwrap(), "2");
        assert_eq!(store.len(), 1);

        store.delete("a").unwrap();
        assert!(store.find("a").unwrap_err().is_not_found());
        assert!(store.delete("a").unwrap_err().is_not_found());
    }
}
