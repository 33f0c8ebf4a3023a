//! Optional integrations available to a run.

use crate::config::Settings;

/// Which external integrations builders may use.
///
/// Resolved once at startup and passed to the builders that need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Credentials can be read from and written to the secret store.
    pub secret_store: bool,
    /// Identities and account aliases can be resolved remotely.
    pub remote_identity: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            secret_store: true,
            remote_identity: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            secret_store: false,
            remote_identity: false,
        }
    }

    /// Settings switches, with remote identity also requiring a usable resolver.
    pub fn resolve(settings: &Settings, resolver_available: bool) -> Self {
        Self {
            secret_store: settings.secret_store_enabled,
            remote_identity: settings.remote_identity_enabled && resolver_available,
        }
    }
}
