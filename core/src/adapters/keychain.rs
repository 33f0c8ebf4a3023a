//! OS keychain secret store.

use keyring::Entry;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ports::SecretStore;

/// Keychain service name entries are stored under.
pub const DEFAULT_SERVICE: &str = "iterme";

/// Secret store backed by the platform credential store
/// (macOS Keychain, Windows Credential Manager, Linux keyutils).
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    /// Creates a store using the default service name.
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    /// Creates a store using a custom service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, label: &str) -> Result<Entry> {
        Entry::new(&self.service, label).map_err(|e| map_keyring_error(label, e))
    }
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringSecretStore {
    fn store(&self, label: &str, payload: &str) -> Result<String> {
        self.entry(label)?
            .set_password(payload)
            .map_err(|e| map_keyring_error(label, e))?;
        debug!(service = %self.service, label, "stored secret");
        Ok(label.to_string())
    }

    fn find(&self, label: &str) -> Result<String> {
        self.entry(label)?
            .get_password()
            .map_err(|e| map_keyring_error(label, e))
    }

    fn delete(&self, label: &str) -> Result<()> {
        self.entry(label)?
            .delete_credential()
            .map_err(|e| map_keyring_error(label, e))?;
        debug!(service = %self.service, label, "deleted secret");
        Ok(())
    }
}

fn map_keyring_error(label: &str, error: keyring::Error) -> Error {
    match error {
        keyring::Error::NoEntry => Error::SecretNotFound(label.to_string()),
        other => Error::SecretStore(format!("{}: {}", label, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entry_maps_to_not_found() {
        let err = map_keyring_error("arn", keyring::Error::NoEntry);
        assert!(err.is_not_found());

        let err = map_keyring_error("arn", keyring::Error::TooLong("label".to_string(), 10));
        assert!(matches!(err, Error::SecretStore(_)));
    }

    #[test]
    fn test_service_name() {
        assert_eq!(KeyringSecretStore::new().service(), "iterme");
        assert_eq!(KeyringSecretStore::with_service("test").service(), "test");
    }
}
