//! Generate command - write the dynamic profiles file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use iterme_core::adapters::{DynamicProfiles, KeyringSecretStore};
use iterme_core::{ProfileGenerator, Settings, ShellEnvironment};

use super::{load_settings, resolver_and_capabilities};

/// Overrides of the stored settings for one run.
#[derive(Args, Debug, Default)]
pub struct GenerateOptions {
    /// AWS config file to read
    #[arg(long)]
    pub aws_config: Option<PathBuf>,

    /// Kubeconfig file to include (repeatable)
    #[arg(long = "kubeconfig")]
    pub kubeconfigs: Vec<PathBuf>,

    /// Directory whose files are all kubeconfigs
    #[arg(long)]
    pub kube_dir: Option<PathBuf>,

    /// Where to write the profiles file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Credentials CSV to import before generating
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Skip profiles for keys stored in the keychain
    #[arg(long)]
    pub no_secrets: bool,

    /// Don't call AWS to look up identities or account aliases
    #[arg(long)]
    pub offline: bool,

    /// Print the profiles document instead of writing it.
    /// Nothing is written, so keys can't be imported in the same run.
    #[arg(long, conflicts_with = "credentials")]
    pub dry_run: bool,
}

impl GenerateOptions {
    fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.aws_config {
            settings.aws_config_path = path_string(path);
        }
        if !self.kubeconfigs.is_empty() {
            settings.kubeconfig_paths = self.kubeconfigs.iter().map(path_string).collect();
        }
        if let Some(dir) = &self.kube_dir {
            settings.kube_dir = Some(path_string(dir));
        }
        if let Some(path) = &self.output {
            settings.profiles_path = path_string(path);
        }
        if self.no_secrets {
            settings.secret_store_enabled = false;
        }
        if self.offline {
            settings.remote_identity_enabled = false;
        }
    }
}

fn path_string(path: &PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

pub async fn run(options: GenerateOptions, json: bool) -> Result<()> {
    let mut settings = load_settings().await?;
    options.apply(&mut settings);

    let env = ShellEnvironment::from_env()?;
    let (resolver, capabilities) = resolver_and_capabilities(&settings);
    let output = settings.profiles_path();
    let generator = ProfileGenerator::new(
        settings,
        env,
        KeyringSecretStore::new(),
        resolver,
        capabilities,
    );

    let credentials = options.credentials.as_deref();
    if options.dry_run {
        let profiles = generator.generate(credentials).await?;
        let document = DynamicProfiles { profiles };
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let profiles = generator.generate_and_write(credentials).await?;

    if json {
        let summary = serde_json::json!({
            "path": output,
            "profiles": profiles.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Wrote {} profiles to {}", profiles.len(), output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let options = GenerateOptions {
            aws_config: Some(PathBuf::from("/etc/aws")),
            kubeconfigs: vec![PathBuf::from("/k/a"), PathBuf::from("/k/b")],
            no_secrets: true,
            offline: true,
            ..Default::default()
        };
        let mut settings = Settings::default();
        options.apply(&mut settings);

        assert_eq!(settings.aws_config_path, "/etc/aws");
        assert_eq!(settings.kubeconfig_paths, vec!["/k/a", "/k/b"]);
        assert_eq!(settings.kube_dir, Settings::default().kube_dir);
        assert!(!settings.secret_store_enabled);
        assert!(!settings.remote_identity_enabled);
    }

    #[test]
    fn test_no_overrides() {
        let mut settings = Settings::default();
        GenerateOptions::default().apply(&mut settings);
        assert_eq!(settings, Settings::default());
    }
}
