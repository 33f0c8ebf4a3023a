//! Config command - show and change settings.

use anyhow::Result;
use iterme_core::ConfigStore;

pub async fn show(json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let settings = store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Configuration file: {}", store.config_path().display());
    println!();
    println!("AWS config:        {}", settings.aws_config_path().display());
    println!(
        "Kubeconfigs:       {}",
        if settings.kubeconfig_paths.is_empty() {
            "(none)".to_string()
        } else {
            settings.kubeconfig_paths.join(", ")
        }
    );
    println!(
        "Kube directory:    {}",
        settings
            .kube_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Profiles file:     {}", settings.profiles_path().display());
    println!(
        "Federated PATH:    {}",
        settings.federated_path.as_deref().unwrap_or("(inherited)")
    );
    println!("Keychain profiles: {}", on_off(settings.secret_store_enabled));
    println!("Remote identity:   {}", on_off(settings.remote_identity_enabled));

    Ok(())
}

pub async fn get(key: &str) -> Result<()> {
    let settings = ConfigStore::new()?.load().await?;
    println!("{}", settings.get(key)?);
    Ok(())
}

pub async fn set(key: &str, value: &str) -> Result<()> {
    let settings = ConfigStore::new()?.set(key, value).await?;
    println!("{} = {}", key, settings.get(key)?);
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
