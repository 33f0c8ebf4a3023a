//! Secret store port (interface).

use crate::error::Result;

/// Port for a labelled key-value secret store.
///
/// Credentials and bookkeeping entries share one store and are told apart
/// by label. Implementations report a missing label as
/// `Error::SecretNotFound`.
pub trait SecretStore: Send + Sync {
    /// Store `payload` under `label`, replacing any previous value.
    ///
    /// Returns the label the payload can be found under.
    fn store(&self, label: &str, payload: &str) -> Result<String>;

    /// Fetch the payload stored under `label`.
    fn find(&self, label: &str) -> Result<String>;

    /// Remove the payload stored under `label`.
    fn delete(&self, label: &str) -> Result<()>;
}

impl<T: SecretStore + ?Sized> SecretStore for &T {
    fn store(&self, label: &str, payload: &str) -> Result<String> {
        (**self).store(label, payload)
    }

    fn find(&self, label: &str) -> Result<String> {
        (**self).find(label)
    }

    fn delete(&self, label: &str) -> Result<()> {
        (**self).delete(label)
    }
}

impl<T: SecretStore + ?Sized> SecretStore for Box<T> {
    fn store(&self, label: &str, payload: &str) -> Result<String> {
        (**self).store(label, payload)
    }

    fn find(&self, label: &str) -> Result<String> {
        (**self).find(label)
    }

    fn delete(&self, label: &str) -> Result<()> {
        (**self).delete(label)
    }
}
