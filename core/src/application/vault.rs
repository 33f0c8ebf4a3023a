//! Credentials kept in the secret store, indexed by identity ARN.

use tracing::debug;

use crate::domain::AccessKeyPair;
use crate::error::{OptionalSecret, Result};
use crate::ports::SecretStore;

/// Label of the entry listing every stored identity.
pub const KNOWN_IDENTITIES_LABEL: &str = "iterme-cache";

/// Key pairs stored under their identity ARN, plus the list of known ARNs.
///
/// The list is a JSON array under [`KNOWN_IDENTITIES_LABEL`] in the same
/// store as the credentials.
pub struct CredentialVault<S> {
    store: S,
}

impl<S: SecretStore> CredentialVault<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every known identity, in the order they were added.
    pub fn identities(&self) -> Result<Vec<String>> {
        match self.store.find(KNOWN_IDENTITIES_LABEL).optional()? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Vec::new()),
        }
    }

    /// The key pair stored for `arn`.
    pub fn key_pair(&self, arn: &str) -> Result<Option<AccessKeyPair>> {
        self.store
            .find(arn)
            .optional()?
            .map(|payload| serde_json::from_str(&payload).map_err(Into::into))
            .transpose()
    }

    /// Store `keys` under `arn` and add `arn` to the known identities.
    pub fn save(&self, arn: &str, keys: &AccessKeyPair) -> Result<()> {
        let label = self.store.store(arn, &serde_json::to_string(keys)?)?;
        debug!(%label, "stored key pair");

        let mut identities = self.identities()?;
        if !identities.iter().any(|known| known == arn) {
            identities.push(arn.to_string());
            self.write_identities(&identities)?;
        }
        Ok(())
    }

    /// Remove the key pair for `arn` and drop it from the known identities.
    ///
    /// Returns false if nothing was stored for `arn`.
    pub fn forget(&self, arn: &str) -> Result<bool> {
        let deleted = self.store.delete(arn).optional()?.is_some();

        let mut identities = self.identities()?;
        let before = identities.len();
        identities.retain(|known| known != arn);
        let listed = identities.len() != before;
        if listed {
            self.write_identities(&identities)?;
        }

        Ok(deleted || listed)
    }

    fn write_identities(&self, identities: &[String]) -> Result<()> {
        self.store
            .store(KNOWN_IDENTITIES_LABEL, &serde_json::to_string(identities)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySecretStore;

    const ARN: &str = "arn:aws:iam::123456789012:user/ci";

    #[test]
    fn test_empty_vault() {
        let vault = CredentialVault::new(MemorySecretStore::new());
        assert!(vault.identities().unwrap().is_empty());
        assert!(vault.key_pair(ARN).unwrap().is_none());
    }

    #[test]
    fn test_save_appends_once() {
        let vault = CredentialVault::new(MemorySecretStore::new());
        let keys = AccessKeyPair::new("AKIA", "secret");

        vault.save(ARN, &keys).unwrap();
        vault.save(ARN, &keys).unwrap();
        vault.save("arn:aws:iam::1:user/other", &keys).unwrap();

        assert_eq!(
            vault.identities().unwrap(),
            vec![ARN, "arn:aws:iam::1:user/other"]
        );
        assert_eq!(vault.key_pair(ARN).unwrap(), Some(keys));

        let raw = vault.store().find(KNOWN_IDENTITIES_LABEL).unwrap();
        assert!(raw.starts_with('['));
    }

    #[test]
    fn test_forget() {
        let vault = CredentialVault::new(MemorySecretStore::new());
        vault.save(ARN, &AccessKeyPair::new("AKIA", "secret")).unwrap();

        assert!(vault.forget(ARN).unwrap());
        assert!(vault.identities().unwrap().is_empty());
        assert!(vault.key_pair(ARN).unwrap().is_none());
        assert!(!vault.forget(ARN).unwrap());
    }

    #[test]
    fn test_corrupt_list_is_an_error() {
        let store = MemorySecretStore::new();
        store.store(KNOWN_IDENTITIES_LABEL, "not json").unwrap();
        let vault = CredentialVault::new(&store);
        assert!(vault.identities().is_err());
    }
}
