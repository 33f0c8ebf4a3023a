//! Profile definitions read from AWS configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Profile definitions keyed by profile name.
pub type ProfileDefinitions = BTreeMap<String, ProfileDefinition>;

// ============================================================================
// Arn
// ============================================================================

/// The parts of an ARN that profiles are tagged with.
///
/// `arn:partition:service:region:account:resource`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arn {
    /// Account id (field 4).
    pub account: String,
    /// Resource field (field 5), e.g. `role/Deploy`.
    pub resource: String,
}

impl Arn {
    /// Parse an ARN, requiring at least six colon-delimited fields.
    pub fn parse(arn: &str) -> Result<Self> {
        let fields: Vec<&str> = arn.split(':').collect();
        if fields.len() < 6 {
            return Err(Error::MalformedArn(arn.to_string()));
        }

        Ok(Self {
            account: fields[4].to_string(),
            resource: fields[5].to_string(),
        })
    }

    /// The role (or user) name: the resource field without its type prefix.
    ///
    /// `role/Deploy` yields `Deploy`; a field without `/` is returned whole.
    pub fn role(&self) -> &str {
        self.resource
            .split_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.resource)
    }
}

// ============================================================================
// ProfileDefinition
// ============================================================================

/// A named profile as declared in an AWS config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub name: String,
    pub account: Option<String>,
    pub role: Option<String>,
    /// Name of the profile whose credentials are used to assume `role`.
    pub source_profile: Option<String>,
    /// Logs in through a federated identity provider.
    pub federated: bool,
}

impl ProfileDefinition {
    /// Create a definition with no recognized keys.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set account and role from a `role_arn` value.
    pub fn with_role_arn(mut self, arn: &str) -> Result<Self> {
        let arn = Arn::parse(arn)?;
        self.role = Some(arn.role().to_string());
        self.account = Some(arn.account);
        Ok(self)
    }
}

/// Whether a profile name looks like a production environment.
pub fn is_production(name: &str) -> bool {
    name.contains("prod") && !name.contains("nonprod")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arn_parse_role() {
        let arn = Arn::parse("arn:aws:iam::123456789012:role/Deploy").unwrap();
        assert_eq!(arn.account, "123456789012");
        assert_eq!(arn.resource, "role/Deploy");
        assert_eq!(arn.role(), "Deploy");
    }

    #[test]
    fn test_arn_parse_untyped_resource() {
        let arn = Arn::parse("arn:partition:service:region:account:resource").unwrap();
        assert_eq!(arn.account, "account");
        assert_eq!(arn.role(), "resource");
    }

    #[test]
    fn test_arn_parse_too_short() {
        let err = Arn::parse("arn:aws:iam::123456789012").unwrap_err();
        assert!(matches!(err, Error::MalformedArn(_)));
    }

    #[test]
    fn test_with_role_arn() {
        let def = ProfileDefinition::new("ops")
            .with_role_arn("arn:aws:iam::111111111111:role/Admin")
            .unwrap();
        assert_eq!(def.account.as_deref(), Some("111111111111"));
        assert_eq!(def.role.as_deref(), Some("Admin"));
        assert!(def.source_profile.is_none());
        assert!(!def.federated);
    }

    #[test]
    fn test_is_production() {
        assert!(is_production("prod"));
        assert!(is_production("team-prod-admin"));
        assert!(!is_production("nonprod"));
        assert!(!is_production("nonprodX"));
        assert!(!is_production("staging"));
    }
}
