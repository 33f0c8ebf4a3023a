//! Writes profiles as an iTerm2 Dynamic Profiles document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::config::write_atomic;
use crate::domain::Profile;
use crate::error::{Error, Result};

/// The top-level Dynamic Profiles document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicProfiles {
    #[serde(rename = "Profiles")]
    pub profiles: Vec<Profile>,
}

/// Writer for a Dynamic Profiles file.
pub struct DynamicProfilesWriter {
    path: PathBuf,
}

impl DynamicProfilesWriter {
    /// Creates a writer with the default path
    /// (`~/Library/Application Support/iTerm2/DynamicProfiles/iterme.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_profiles_path()?,
        })
    }

    /// Creates a writer with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `profiles`, replacing the previous document.
    pub async fn write(&self, profiles: &[Profile]) -> Result<()> {
        let document = DynamicProfiles {
            profiles: profiles.to_vec(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        write_atomic(&self.path, &content).await?;
        info!(
            path = %self.path.display(),
            profiles = profiles.len(),
            "wrote dynamic profiles"
        );
        Ok(())
    }

    /// Reads the current document. Returns an empty document if the file doesn't exist.
    pub async fn read(&self) -> Result<DynamicProfiles> {
        if !self.path.exists() {
            return Ok(DynamicProfiles::default());
        }

        let content = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// `~/Library/Application Support/iTerm2/DynamicProfiles/iterme.json`
pub fn default_profiles_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
    Ok(home
        .join("Library")
        .join("Application Support")
        .join("iTerm2")
        .join("DynamicProfiles")
        .join("iterme.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileTemplate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DynamicProfiles").join("iterme.json");
        let writer = DynamicProfilesWriter::with_path(path.clone());

        assert!(writer.read().await.unwrap().profiles.is_empty());

        let template = ProfileTemplate::new("/home/user");
        let mut dev = template.profile("dev");
        dev.bind_login_shortcut("base");
        let profiles = vec![template.profile("base"), dev];

        writer.write(&profiles).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["Profiles"][0]["Name"], "base");
        assert_eq!(
            raw["Profiles"][1]["Keyboard Map"]["0x61-0x80000"]["Text"],
            "login-base"
        );

        let back = writer.read().await.unwrap();
        assert_eq!(back.profiles, profiles);
    }

    #[test]
    fn test_default_path() {
        let path = default_profiles_path().unwrap();
        assert!(path.ends_with("iTerm2/DynamicProfiles/iterme.json"));
    }
}
