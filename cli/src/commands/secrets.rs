//! Import, export and forget commands - keys kept in the keychain.

use std::path::Path;

use anyhow::{bail, Result};
use iterme_core::adapters::KeyringSecretStore;
use iterme_core::{CredentialVault, ProfileTemplate, SecretBackedProfileBuilder, ShellEnvironment};

use super::{load_settings, resolver_and_capabilities};

pub async fn import(path: &Path, json: bool) -> Result<()> {
    let settings = load_settings().await?;
    let env = ShellEnvironment::from_env()?;
    let (resolver, capabilities) = resolver_and_capabilities(&settings);

    let builder = SecretBackedProfileBuilder::new(
        KeyringSecretStore::new(),
        resolver,
        capabilities,
        ProfileTemplate::new(&env.home),
    );
    let arn = builder.import_file(path).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "arn": arn }))?);
    } else {
        println!("Stored keys for {}", arn);
        println!("Run `iterme generate` to add its profile.");
    }
    Ok(())
}

/// Print `export` lines for the stored pair, for `eval` in a shell.
pub async fn export(arn: &str) -> Result<()> {
    let vault = CredentialVault::new(KeyringSecretStore::new());
    let Some(keys) = vault.key_pair(arn)? else {
        bail!("No keys stored for {}", arn);
    };

    print!("{}", keys.export_script());
    Ok(())
}

pub async fn forget(arn: &str) -> Result<()> {
    let vault = CredentialVault::new(KeyringSecretStore::new());
    if vault.forget(arn)? {
        println!("Removed {}", arn);
    } else {
        println!("{} is not stored", arn);
    }
    Ok(())
}
