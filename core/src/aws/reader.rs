//! Reads profile definitions from an AWS config file.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::ini::{IniDocument, Section};
use crate::domain::{ProfileDefinition, ProfileDefinitions};
use crate::error::{Error, Result};

const ROLE_ARN: &str = "role_arn";
const SOURCE_PROFILE: &str = "source_profile";
const AZURE_TENANT_ID: &str = "azure_tenant_id";

/// Reader for `~/.aws/config`-style files.
pub struct AwsConfigReader {
    config_path: PathBuf,
}

impl AwsConfigReader {
    /// Creates a reader with the default path (~/.aws/config).
    pub fn new() -> Result<Self> {
        let path = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not find home directory".to_string()))?
            .join(".aws")
            .join("config");

        Ok(Self { config_path: path })
    }

    /// Creates a reader for a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads and parses the config file.
    pub async fn read(&self) -> Result<ProfileDefinitions> {
        let content = fs::read_to_string(&self.config_path).await?;
        let definitions = Self::parse(&content)?;
        debug!(
            path = %self.config_path.display(),
            profiles = definitions.len(),
            "read AWS config"
        );
        Ok(definitions)
    }

    /// Parses config text into definitions keyed by profile name.
    pub fn parse(source: &str) -> Result<ProfileDefinitions> {
        let doc = IniDocument::parse(source)?;
        let mut definitions = ProfileDefinitions::new();

        for section in &doc.sections {
            let definition = definition_from_section(section)?;
            if definitions.contains_key(&definition.name) {
                return Err(Error::DuplicateProfile(definition.name));
            }
            definitions.insert(definition.name.clone(), definition);
        }

        Ok(definitions)
    }
}

/// `[<kind> <name>]`: the name is the second whitespace-separated token.
fn definition_from_section(section: &Section) -> Result<ProfileDefinition> {
    let name = section
        .header
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::MalformedSection(section.header.clone()))?;

    let mut definition = ProfileDefinition::new(name);

    if let Some(arn) = section.get(ROLE_ARN) {
        definition = definition.with_role_arn(arn)?;
    }
    if let Some(source) = section.get(SOURCE_PROFILE) {
        definition.source_profile = Some(source.to_string());
    }
    definition.federated = section.contains_key(AZURE_TENANT_ID);

    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_minimal_profile() {
        let defs = AwsConfigReader::parse("[profile 1]\n").unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs["1"], ProfileDefinition::new("1"));
    }

    #[test]
    fn test_role_arn() {
        let defs = AwsConfigReader::parse(
            "
            [profile 2]
            role_arn = arn:partition:service:region:account:resource
            ",
        )
        .unwrap();
        let def = &defs["2"];
        assert_eq!(def.account.as_deref(), Some("account"));
        assert_eq!(def.role.as_deref(), Some("resource"));
        assert!(def.source_profile.is_none());
        assert!(!def.federated);
    }

    #[test]
    fn test_source_profile() {
        let defs = AwsConfigReader::parse(
            "
            [profile 3]

            [profile 4]
            source_profile = 3
            ",
        )
        .unwrap();
        assert_eq!(defs["3"].source_profile, None);
        assert_eq!(defs["4"].source_profile.as_deref(), Some("3"));
    }

    #[test]
    fn test_azure_tenant_marks_federated() {
        let defs = AwsConfigReader::parse(
            "
            [profile 5]
            azure_tenant_id = foo
            [profile 6]
            source_profile = 5
            ",
        )
        .unwrap();
        assert!(defs["5"].federated);
        assert!(!defs["6"].federated);
    }

    #[test]
    fn test_dangling_source_profile_is_kept() {
        let defs = AwsConfigReader::parse("[profile a]\nsource_profile = missing\n").unwrap();
        assert_eq!(defs["a"].source_profile.as_deref(), Some("missing"));
    }

    #[test]
    fn test_malformed_section() {
        let err = AwsConfigReader::parse("[default]\nregion = eu-west-1\n").unwrap_err();
        assert!(matches!(err, Error::MalformedSection(h) if h == "default"));
    }

    #[test]
    fn test_malformed_arn() {
        let err = AwsConfigReader::parse("[profile a]\nrole_arn = arn:aws:iam\n").unwrap_err();
        assert!(matches!(err, Error::MalformedArn(_)));
    }

    #[test]
    fn test_duplicate_profile() {
        let err = AwsConfigReader::parse("[profile a]\n[sso-session a]\n").unwrap_err();
        assert!(matches!(err, Error::DuplicateProfile(n) if n == "a"));
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "[profile a]\n[profile b]\nsource_profile = a\n").unwrap();

        let defs = AwsConfigReader::with_path(path).read().await.unwrap();
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let reader = AwsConfigReader::with_path(dir.path().join("absent"));
        assert!(matches!(reader.read().await, Err(Error::Io(_))));
    }
}
