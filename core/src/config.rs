//! Configuration management for generation settings.
//!
//! Stores configuration in JSON format at `~/.iterme/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Settings stored in JSON format.
///
/// Paths are stored as given; a leading `~/` is expanded when read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// AWS config file profiles are derived from.
    #[serde(default = "default_aws_config_path")]
    pub aws_config_path: String,

    /// Kubeconfig files to build profiles for.
    #[serde(default)]
    pub kubeconfig_paths: Vec<String>,

    /// Directory whose files are all treated as kubeconfigs.
    #[serde(default = "default_kube_dir")]
    pub kube_dir: Option<String>,

    /// Where the Dynamic Profiles document is written.
    #[serde(default = "default_profiles_path")]
    pub profiles_path: String,

    /// `PATH` for federated login profiles. Defaults to the current `PATH`.
    #[serde(default)]
    pub federated_path: Option<String>,

    /// Build profiles from credentials in the OS keychain.
    #[serde(default = "default_true")]
    pub secret_store_enabled: bool,

    /// Allow calls to the cloud provider to resolve identities and aliases.
    #[serde(default = "default_true")]
    pub remote_identity_enabled: bool,
}

fn default_aws_config_path() -> String {
    "~/.aws/config".to_string()
}

fn default_kube_dir() -> Option<String> {
    Some("~/.kube/configs".to_string())
}

fn default_profiles_path() -> String {
    "~/Library/Application Support/iTerm2/DynamicProfiles/iterme.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aws_config_path: default_aws_config_path(),
            kubeconfig_paths: Vec::new(),
            kube_dir: default_kube_dir(),
            profiles_path: default_profiles_path(),
            federated_path: None,
            secret_store_enabled: true,
            remote_identity_enabled: true,
        }
    }
}

impl Settings {
    pub fn aws_config_path(&self) -> PathBuf {
        expand_home(&self.aws_config_path)
    }

    pub fn kubeconfig_paths(&self) -> Vec<PathBuf> {
        self.kubeconfig_paths.iter().map(|p| expand_home(p)).collect()
    }

    pub fn kube_dir(&self) -> Option<PathBuf> {
        self.kube_dir.as_deref().map(expand_home)
    }

    pub fn profiles_path(&self) -> PathBuf {
        expand_home(&self.profiles_path)
    }

    /// A setting's value by its camelCase name.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "awsConfigPath" => self.aws_config_path.clone(),
            "kubeconfigPaths" => self.kubeconfig_paths.join(","),
            "kubeDir" => self.kube_dir.clone().unwrap_or_default(),
            "profilesPath" => self.profiles_path.clone(),
            "federatedPath" => self.federated_path.clone().unwrap_or_default(),
            "secretStoreEnabled" => self.secret_store_enabled.to_string(),
            "remoteIdentityEnabled" => self.remote_identity_enabled.to_string(),
            _ => return Err(Error::Config(format!("Unknown setting: {}", key))),
        };
        Ok(value)
    }

    /// Set a setting from its camelCase name and a string value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "awsConfigPath" => self.aws_config_path = value.to_string(),
            "kubeconfigPaths" => {
                self.kubeconfig_paths = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "kubeDir" => self.kube_dir = non_empty(value),
            "profilesPath" => self.profiles_path = value.to_string(),
            "federatedPath" => self.federated_path = non_empty(value),
            "secretStoreEnabled" => self.secret_store_enabled = parse_bool(key, value)?,
            "remoteIdentityEnabled" => self.remote_identity_enabled = parse_bool(key, value)?,
            _ => return Err(Error::Config(format!("Unknown setting: {}", key))),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{} expects true or false, got {}", key, value)))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Configuration store for managing settings.
///
/// Handles reading and writing configuration to `~/.iterme/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.iterme/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".iterme").join("config.json");

        Ok(Self { config_path })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default settings if the file doesn't exist.
    pub async fn load(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        // Serialize with pretty printing
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        write_atomic(&self.config_path, &content).await
    }

    /// Change one setting and persist it.
    pub async fn set(&self, key: &str, value: &str) -> Result<Settings> {
        let mut settings = self.load().await?;
        settings.set(key, value)?;
        self.save(&settings).await?;
        Ok(settings)
    }
}

/// Write `content` to `path` by writing a temp file then renaming it.
///
/// Creates the parent directory if it doesn't exist.
pub(crate) async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| Error::Config(format!("Failed to create temp file: {}", e)))?;

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;

    file.sync_all()
        .await
        .map_err(|e| Error::Config(format!("Failed to sync {}: {}", path.display(), e)))?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| Error::Config(format!("Failed to rename temp file: {}", e)))?;

    Ok(())
}
