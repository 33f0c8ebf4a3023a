//! Builds one profile per kubeconfig, linked to its AWS login profile.

use std::collections::HashSet;
use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, error, warn};

use super::kubeconfig::{aws_profile, current_context, Kubeconfig};
use crate::domain::{Color, Profile, ProfileTemplate, SOURCE_PROFILE_TAG_PREFIX};
use crate::environment::ShellEnvironment;
use crate::error::{Error, Result};

/// Builds `k8s-<cluster>` profiles.
#[derive(Debug, Clone)]
pub struct K8sProfileBuilder {
    template: ProfileTemplate,
    env: ShellEnvironment,
}

impl K8sProfileBuilder {
    pub fn new(template: ProfileTemplate, env: ShellEnvironment) -> Self {
        Self { template, env }
    }

    /// Build the profile for one kubeconfig.
    ///
    /// When the kubeconfig authenticates through an AWS profile that has a
    /// source profile, option+a opens that source profile's login profile.
    pub fn build(
        &self,
        kubeconfig: &Value,
        kubeconfig_path: &Path,
        aws_profiles: &[Profile],
    ) -> Result<Profile> {
        let cluster = current_context(kubeconfig)?;
        let aws = aws_profile(kubeconfig);
        let path = kubeconfig_path.to_string_lossy().into_owned();

        let mut vars = vec![("KUBECONFIG", path.as_str())];
        if let Some(aws) = aws {
            vars.push(("AWS_PROFILE", aws));
        }

        let mut profile = self
            .template
            .profile(format!("k8s-{}", cluster))
            .with_command(self.env.login_shell(&vars))
            .with_tags([Some("k8s"), Some(cluster), aws]);
        profile.background_color = Some(Color::KUBERNETES);

        if let Some(source) = aws.and_then(|aws| find_source_profile(aws, aws_profiles)) {
            profile.bind_login_shortcut(&source);
        }

        debug!(profile = %profile.name, aws_profile = ?aws, "kubernetes profile");
        Ok(profile)
    }

    /// Build profiles for every kubeconfig.
    ///
    /// Kubeconfigs without a current context, and later kubeconfigs for a
    /// cluster that already has a profile, are skipped with a warning.
    pub fn build_all(&self, kubeconfigs: &[Kubeconfig], aws_profiles: &[Profile]) -> Vec<Profile> {
        let mut seen = HashSet::new();
        let mut profiles = Vec::new();

        for config in kubeconfigs {
            match self.build(&config.document, &config.path, aws_profiles) {
                Ok(profile) if seen.insert(profile.name.clone()) => profiles.push(profile),
                Ok(profile) => warn!(
                    profile = %profile.name,
                    path = %config.path.display(),
                    "duplicate kubernetes profile, skipping"
                ),
                Err(e) => warn!(path = %config.path.display(), error = %e, "skipping kubeconfig"),
            }
        }

        profiles
    }
}

/// The derived profile called `name`.
pub fn find_by_name<'a>(name: &str, profiles: &'a [Profile]) -> Option<&'a Profile> {
    profiles.iter().find(|p| p.name == name)
}

/// The source profile recorded in a profile's `source_profile_` tag.
///
/// The link tag is appended after the plain tags, so the last match wins
/// over a plain tag that happens to carry the prefix.
pub fn extract_relationship_tag(profile: &Profile) -> Option<&str> {
    profile
        .tags
        .iter()
        .rev()
        .find_map(|tag| tag.strip_prefix(SOURCE_PROFILE_TAG_PREFIX))
}

/// The source profile of the derived profile called `name`.
///
/// A missing profile is reported and yields `None`.
pub fn find_source_profile(name: &str, profiles: &[Profile]) -> Option<String> {
    let Some(profile) = find_by_name(name, profiles) else {
        error!("{}", Error::ProfileNotFound(name.to_string()));
        return None;
    };
    extract_relationship_tag(profile).map(str::to_string)
}
