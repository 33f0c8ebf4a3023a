//! Subcommand implementations.

pub mod config;
pub mod generate;
pub mod list;
pub mod secrets;
pub mod sort;

use anyhow::Result;
use iterme_core::adapters::AwsCliIdentityResolver;
use iterme_core::{Capabilities, ConfigStore, Settings};
use tracing::warn;

/// Settings from `~/.iterme/config.json`, or defaults.
async fn load_settings() -> Result<Settings> {
    Ok(ConfigStore::new()?.load().await?)
}

/// The aws CLI resolver and the capabilities this run may use.
fn resolver_and_capabilities(settings: &Settings) -> (AwsCliIdentityResolver, Capabilities) {
    let resolver = AwsCliIdentityResolver::new();
    if settings.remote_identity_enabled && !resolver.is_available() {
        warn!("aws CLI not found, identity and alias lookups disabled");
    }
    let capabilities = Capabilities::resolve(settings, resolver.is_available());
    (resolver, capabilities)
}
