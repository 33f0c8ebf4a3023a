//! Derives terminal profiles from AWS profile definitions.
//!
//! Derivation runs in two passes:
//!
//! 1. One primary profile per definition, in mapping order. A definition
//!    with a `source_profile` is tagged `source_profile_<source>` and gets
//!    an option+a shortcut to `login-<source>`.
//! 2. One synthetic `login-<source>` profile per distinct source profile,
//!    in order of first reference. It runs the federated login for the
//!    source profile and keeps the pane open for a minute on failure.
//!
//! Primary profiles always precede login profiles in the output.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::{
    is_production, login_profile_name, Color, Profile, ProfileDefinition, ProfileDefinitions,
    ProfileTemplate,
};
use crate::environment::{ShellEnvironment, CA_BUNDLE_VAR};
use crate::error::{Error, Result};

/// Federated login invocation run by login profiles.
const FEDERATED_LOGIN: &str = "aws-azure-login --no-prompt || sleep 60";

/// Builds primary and login profiles from AWS definitions.
#[derive(Debug, Clone)]
pub struct ProfileDerivationEngine {
    template: ProfileTemplate,
    env: ShellEnvironment,
}

impl ProfileDerivationEngine {
    pub fn new(template: ProfileTemplate, env: ShellEnvironment) -> Self {
        Self { template, env }
    }

    /// Derive all profiles.
    ///
    /// `federated_path` supplies the `PATH` for federated login profiles and
    /// is only called when one is built. A `source_profile` that names no
    /// definition fails the whole derivation with `UnknownSourceProfile`.
    pub fn derive<F>(
        &self,
        definitions: &ProfileDefinitions,
        federated_path: F,
    ) -> Result<Vec<Profile>>
    where
        F: Fn() -> String,
    {
        let mut profiles: Vec<Profile> = definitions
            .values()
            .map(|def| self.primary_profile(def))
            .collect();
        let primary = profiles.len();

        for (dependent, source) in distinct_sources(definitions) {
            let Some(source_def) = definitions.get(source) else {
                return Err(Error::UnknownSourceProfile {
                    profile: dependent.to_string(),
                    source_profile: source.to_string(),
                });
            };
            profiles.push(self.login_profile(source_def, &federated_path));
        }

        info!(
            primary,
            login = profiles.len() - primary,
            "derived AWS profiles"
        );
        Ok(profiles)
    }

    fn primary_profile(&self, def: &ProfileDefinition) -> Profile {
        let command = self.env.login_shell(&[("AWS_PROFILE", def.name.as_str())]);

        let mut profile = self
            .template
            .profile(&def.name)
            .with_command(command)
            .with_tags([
                def.account.clone(),
                def.role.clone(),
                def.source_profile.clone(),
            ]);

        if let Some(source) = &def.source_profile {
            profile.link_source_profile(source);
        }

        if is_production(&def.name) {
            profile.background_color = Some(Color::PRODUCTION);
        }

        debug!(profile = %profile.name, tags = ?profile.tags, "primary profile");
        profile
    }

    fn login_profile<F>(&self, source: &ProfileDefinition, federated_path: &F) -> Profile
    where
        F: Fn() -> String,
    {
        let path = source.federated.then(federated_path);

        let mut vars: Vec<(&str, &str)> = vec![("AWS_PROFILE", source.name.as_str())];
        if let Some(path) = &path {
            vars.push(("PATH", path.as_str()));
        }
        if let Some(ca_bundle) = &self.env.ca_bundle {
            vars.push((CA_BUNDLE_VAR, ca_bundle.as_str()));
        }

        let command = self
            .env
            .login_command(&vars, &["/bin/bash", "-c", FEDERATED_LOGIN]);

        let mut profile = self
            .template
            .profile(login_profile_name(&source.name))
            .with_command(command)
            .with_tags([Some("login".to_string()), source.account.clone()]);
        profile.badge_text = Some("login".to_string());

        debug!(profile = %profile.name, federated = source.federated, "login profile");
        profile
    }
}

/// Distinct `source_profile` values with the first profile referencing each,
/// in mapping order.
fn distinct_sources(definitions: &ProfileDefinitions) -> Vec<(&str, &str)> {
    let mut seen = HashSet::new();
    definitions
        .values()
        .filter_map(|def| {
            def.source_profile
                .as_deref()
                .map(|source| (def.name.as_str(), source))
        })
        .filter(|(_, source)| seen.insert(*source))
        .collect()
}
