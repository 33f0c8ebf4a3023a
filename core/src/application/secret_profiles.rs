//! Profiles for identities whose static keys live in the secret store.

use std::path::Path;

use tokio::fs;
use tracing::{debug, error, info, warn};

use super::capabilities::Capabilities;
use super::vault::CredentialVault;
use crate::domain::{AccessKeyPair, Arn, CustomCommand, Profile, ProfileTemplate};
use crate::environment::shell_quote;
use crate::error::{Error, Result};
use crate::ports::{IdentityResolver, SecretStore};

/// Builds one profile per stored identity.
///
/// Profiles never contain the secret itself: the shell evaluates
/// `iterme export <arn>` on startup, which reads the pair from the store.
pub struct SecretBackedProfileBuilder<S, R> {
    vault: CredentialVault<S>,
    resolver: R,
    capabilities: Capabilities,
    template: ProfileTemplate,
}

impl<S, R> SecretBackedProfileBuilder<S, R>
where
    S: SecretStore,
    R: IdentityResolver,
{
    pub fn new(store: S, resolver: R, capabilities: Capabilities, template: ProfileTemplate) -> Self {
        Self {
            vault: CredentialVault::new(store),
            resolver,
            capabilities,
            template,
        }
    }

    pub fn vault(&self) -> &CredentialVault<S> {
        &self.vault
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Resolve who `keys` belong to and store them under that ARN.
    pub async fn import(&self, keys: &AccessKeyPair) -> Result<String> {
        if !self.capabilities.secret_store {
            return Err(Error::CapabilityDisabled("secret store"));
        }
        if !self.capabilities.remote_identity {
            return Err(Error::CapabilityDisabled("remote identity"));
        }

        let arn = self.resolver.resolve_identity(keys).await?;
        self.vault.save(&arn, keys)?;
        info!(%arn, "imported credentials");
        Ok(arn)
    }

    /// Import the key pair from a console credentials CSV.
    pub async fn import_file(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        let keys = AccessKeyPair::from_credentials_csv(&content)?;
        self.import(&keys).await
    }

    /// Import `credentials` if given, then build a profile per known identity.
    pub async fn build_all(&self, credentials: Option<&Path>) -> Result<Vec<Profile>> {
        if !self.capabilities.secret_store {
            if credentials.is_some() {
                return Err(Error::CapabilityDisabled("secret store"));
            }
            debug!("secret store disabled, no secret-backed profiles");
            return Ok(Vec::new());
        }

        if let Some(path) = credentials {
            self.import_file(path).await?;
        }

        let mut profiles = Vec::new();
        for identity in self.vault.identities()? {
            if let Some(profile) = self.build(&identity).await? {
                profiles.push(profile);
            }
        }

        info!(profiles = profiles.len(), "built secret-backed profiles");
        Ok(profiles)
    }

    async fn build(&self, identity: &str) -> Result<Option<Profile>> {
        let arn = match Arn::parse(identity) {
            Ok(arn) => arn,
            Err(e) => {
                warn!(identity, error = %e, "skipping stored identity");
                return Ok(None);
            }
        };

        let Some(keys) = self.vault.key_pair(identity)? else {
            warn!(identity, "no stored key pair, skipping");
            return Ok(None);
        };

        let alias = if self.capabilities.remote_identity {
            match self.resolver.resolve_account_alias(&keys).await {
                Ok(alias) => alias,
                Err(e) => {
                    error!(identity, error = %e, "skipping profile");
                    return Ok(None);
                }
            }
        } else {
            None
        };

        let mut profile = self.template.profile(identity).with_tags([
            Some(arn.account.as_str()),
            Some(arn.role()),
            alias.as_deref(),
        ]);
        profile.custom_command = CustomCommand::No;
        profile.initial_text = Some(export_command(identity));
        profile.badge_text = alias;

        Ok(Some(profile))
    }
}

/// Shell line that loads the stored pair for `arn` into the environment.
pub fn export_command(arn: &str) -> String {
    format!("eval \"$(iterme export {})\"", shell_quote(arn))
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use parking_lot::RwLock;
    use tempfile::tempdir;

    use super::*;
    use crate::adapters::MemorySecretStore;

    const ARN: &str = "arn:aws:iam::123456789012:user/ci";

    /// Mock resolver keyed by access key id.
    #[derive(Default)]
    struct MockResolver {
        identities: HashMap<String, String>,
        aliases: HashMap<String, String>,
        failing_aliases: HashSet<String>,
        calls: RwLock<usize>,
    }

    impl MockResolver {
        fn with_identity(mut self, access_key_id: &str, arn: &str) -> Self {
            self.identities
                .insert(access_key_id.to_string(), arn.to_string());
            self
        }

        fn with_alias(mut self, access_key_id: &str, alias: &str) -> Self {
            self.aliases
                .insert(access_key_id.to_string(), alias.to_string());
            self
        }

        fn failing_alias(mut self, access_key_id: &str) -> Self {
            self.failing_aliases.insert(access_key_id.to_string());
            self
        }

        fn calls(&self) -> usize {
            *self.calls.read()
        }
    }

    impl IdentityResolver for MockResolver {
        async fn resolve_identity(&self, keys: &AccessKeyPair) -> Result<String> {
            *self.calls.write() += 1;
            self.identities
                .get(&keys.access_key_id)
                .cloned()
                .ok_or_else(|| Error::RemoteIdentity("InvalidClientTokenId".to_string()))
        }

        async fn resolve_account_alias(&self, keys: &AccessKeyPair) -> Result<Option<String>> {
            *self.calls.write() += 1;
            if self.failing_aliases.contains(&keys.access_key_id) {
                return Err(Error::RemoteAlias("AccessDenied".to_string()));
            }
            Ok(self.aliases.get(&keys.access_key_id).cloned())
        }
    }

    fn builder<S: SecretStore>(
        store: S,
        resolver: MockResolver,
        capabilities: Capabilities,
    ) -> SecretBackedProfileBuilder<S, MockResolver> {
        SecretBackedProfileBuilder::new(
            store,
            resolver,
            capabilities,
            ProfileTemplate::new("/Users/tester"),
        )
    }

    fn write_csv(dir: &Path, access_key_id: &str) -> std::path::PathBuf {
        let path = dir.join("credentials.csv");
        std::fs::write(
            &path,
            format!(
                "User name,Password,Access key ID,Secret access key,Console login link\n\
                 ci,,{},wJalr/EXAMPLEKEY,https://example.signin\n",
                access_key_id
            ),
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_and_build() {
        let dir = tempdir().unwrap();
        let csv = write_csv(dir.path(), "AKIA1");
        let store = MemorySecretStore::new();
        let resolver = MockResolver::default()
            .with_identity("AKIA1", ARN)
            .with_alias("AKIA1", "acme-dev");

        let builder = builder(&store, resolver, Capabilities::all());
        let profiles = builder.build_all(Some(&csv)).await.unwrap();

        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.name, ARN);
        assert_eq!(profile.guid, ARN);
        assert!(profile.command.is_empty());
        assert_eq!(profile.custom_command, CustomCommand::No);
        assert_eq!(profile.tags, vec!["123456789012", "ci", "acme-dev"]);
        assert_eq!(profile.badge_text.as_deref(), Some("acme-dev"));
        assert_eq!(
            profile.initial_text.as_deref(),
            Some("eval \"$(iterme export arn:aws:iam::123456789012:user/ci)\"")
        );

        // The secret stays in the store.
        let json = serde_json::to_string(profile).unwrap();
        assert!(!json.contains("wJalr"));
        assert_eq!(
            builder.vault().key_pair(ARN).unwrap().unwrap().access_key_id,
            "AKIA1"
        );
        assert_eq!(builder.vault().identities().unwrap(), vec![ARN]);
    }

    #[tokio::test]
    async fn test_reimport_does_not_duplicate() {
        let dir = tempdir().unwrap();
        let csv = write_csv(dir.path(), "AKIA1");
        let resolver = MockResolver::default().with_identity("AKIA1", ARN);

        let builder = builder(MemorySecretStore::new(), resolver, Capabilities::all());
        builder.build_all(Some(&csv)).await.unwrap();
        let profiles = builder.build_all(Some(&csv)).await.unwrap();

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].tags, vec!["123456789012", "ci"]);
        assert!(profiles[0].badge_text.is_none());
    }

    #[tokio::test]
    async fn test_alias_failure_skips_only_that_profile() {
        let store = MemorySecretStore::new();
        let vault = CredentialVault::new(&store);
        vault
            .save(ARN, &AccessKeyPair::new("AKIA1", "s1"))
            .unwrap();
        vault
            .save("arn:aws:iam::999999999999:user/ops", &AccessKeyPair::new("AKIA2", "s2"))
            .unwrap();

        let resolver = MockResolver::default()
            .failing_alias("AKIA1")
            .with_alias("AKIA2", "ops");
        let profiles = builder(&store, resolver, Capabilities::all())
            .build_all(None)
            .await
            .unwrap();

        let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arn:aws:iam::999999999999:user/ops"]);
    }

    #[tokio::test]
    async fn test_missing_pair_and_bad_arn_are_skipped() {
        let store = MemorySecretStore::new();
        store
            .store(
                crate::application::vault::KNOWN_IDENTITIES_LABEL,
                &serde_json::to_string(&[ARN, "not-an-arn"]).unwrap(),
            )
            .unwrap();

        let profiles = builder(&store, MockResolver::default(), Capabilities::all())
            .build_all(None)
            .await
            .unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_identity_aborts_import() {
        let dir = tempdir().unwrap();
        let csv = write_csv(dir.path(), "AKIA-UNKNOWN");
        let store = MemorySecretStore::new();

        let err = builder(&store, MockResolver::default(), Capabilities::all())
            .build_all(Some(&csv))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RemoteIdentity(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_credentials_file() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("credentials.csv");
        std::fs::write(&csv, "only a header\n").unwrap();

        let err = builder(MemorySecretStore::new(), MockResolver::default(), Capabilities::all())
            .build_all(Some(&csv))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Credentials(_)));
    }

    #[test]
    fn test_secret_store_disabled() {
        let store = MemorySecretStore::new();
        CredentialVault::new(&store)
            .save(ARN, &AccessKeyPair::new("AKIA1", "s1"))
            .unwrap();
        let caps = Capabilities {
            secret_store: false,
            remote_identity: true,
        };
        let builder = builder(&store, MockResolver::default(), caps);

        let profiles = tokio_test::block_on(builder.build_all(None)).unwrap();
        assert!(profiles.is_empty());

        let err = tokio_test::block_on(builder.build_all(Some(Path::new("/tmp/creds.csv"))))
            .unwrap_err();
        assert!(matches!(err, Error::CapabilityDisabled(_)));
    }

    #[tokio::test]
    async fn test_remote_identity_disabled() {
        let store = MemorySecretStore::new();
        CredentialVault::new(&store)
            .save(ARN, &AccessKeyPair::new("AKIA1", "s1"))
            .unwrap();
        let caps = Capabilities {
            secret_store: true,
            remote_identity: false,
        };
        let resolver = MockResolver::default().with_alias("AKIA1", "acme");
        let builder = builder(&store, resolver, caps);

        let profiles = builder.build_all(None).await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert!(profiles[0].badge_text.is_none());
        assert_eq!(builder.resolver.calls(), 0);

        let err = builder
            .import(&AccessKeyPair::new("AKIA1", "s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CapabilityDisabled("remote identity")));
    }

    #[test]
    fn test_export_command_quotes() {
        assert_eq!(
            export_command("arn:aws:iam::1:user/a b"),
            "eval \"$(iterme export 'arn:aws:iam::1:user/a b')\""
        );
    }
}
