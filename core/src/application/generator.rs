//! One generation pass over every profile source.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use super::capabilities::Capabilities;
use super::secret_profiles::SecretBackedProfileBuilder;
use crate::adapters::DynamicProfilesWriter;
use crate::aws::{AwsConfigReader, ProfileDerivationEngine};
use crate::config::Settings;
use crate::domain::{Profile, ProfileDefinitions, ProfileTemplate};
use crate::environment::ShellEnvironment;
use crate::error::{Error, Result};
use crate::kubernetes::{load_kubeconfigs, K8sProfileBuilder};
use crate::ports::{IdentityResolver, SecretStore};

/// Builds the full profile list: AWS, then Kubernetes, then secret-backed.
pub struct ProfileGenerator<S, R> {
    settings: Settings,
    derivation: ProfileDerivationEngine,
    kubernetes: K8sProfileBuilder,
    secrets: SecretBackedProfileBuilder<S, R>,
}

impl<S, R> ProfileGenerator<S, R>
where
    S: SecretStore,
    R: IdentityResolver,
{
    pub fn new(
        settings: Settings,
        env: ShellEnvironment,
        store: S,
        resolver: R,
        capabilities: Capabilities,
    ) -> Self {
        let template = ProfileTemplate::new(&env.home);
        Self {
            settings,
            derivation: ProfileDerivationEngine::new(template.clone(), env.clone()),
            kubernetes: K8sProfileBuilder::new(template.clone(), env),
            secrets: SecretBackedProfileBuilder::new(store, resolver, capabilities, template),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn secrets(&self) -> &SecretBackedProfileBuilder<S, R> {
        &self.secrets
    }

    /// Run every builder and return the combined list.
    ///
    /// `credentials` is imported into the secret store before secret-backed
    /// profiles are built.
    pub async fn generate(&self, credentials: Option<&Path>) -> Result<Vec<Profile>> {
        let definitions = self.read_definitions().await?;
        let mut profiles = self
            .derivation
            .derive(&definitions, || self.federated_path())?;

        let kubeconfigs = load_kubeconfigs(
            &self.settings.kubeconfig_paths(),
            self.settings.kube_dir().as_deref(),
        )
        .await;
        let k8s = self.kubernetes.build_all(&kubeconfigs, &profiles);
        profiles.extend(k8s);

        profiles.extend(self.secrets.build_all(credentials).await?);

        check_unique_names(&profiles)?;
        info!(profiles = profiles.len(), "generated profiles");
        Ok(profiles)
    }

    /// Generate and write the Dynamic Profiles document to the configured path.
    pub async fn generate_and_write(&self, credentials: Option<&Path>) -> Result<Vec<Profile>> {
        let profiles = self.generate(credentials).await?;
        DynamicProfilesWriter::with_path(self.settings.profiles_path())
            .write(&profiles)
            .await?;
        Ok(profiles)
    }

    async fn read_definitions(&self) -> Result<ProfileDefinitions> {
        let reader = AwsConfigReader::with_path(self.settings.aws_config_path());
        if !reader.config_path().exists() {
            warn!(
                path = %reader.config_path().display(),
                "AWS config not found, no AWS profiles"
            );
            return Ok(ProfileDefinitions::new());
        }
        reader.read().await
    }

    fn federated_path(&self) -> String {
        self.settings
            .federated_path
            .clone()
            .unwrap_or_else(|| std::env::var("PATH").unwrap_or_default())
    }
}

fn check_unique_names(profiles: &[Profile]) -> Result<()> {
    let mut seen = HashSet::new();
    for profile in profiles {
        if !seen.insert(profile.name.as_str()) {
            return Err(Error::DuplicateProfileName(profile.name.clone()));
        }
    }
    Ok(())
}
