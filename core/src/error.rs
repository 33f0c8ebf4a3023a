//! Error types for the iterme-core library.

use thiserror::Error;

/// Result type alias for iterme operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while deriving and storing profiles.
#[derive(Error, Debug)]
pub enum Error {
    /// A line of the AWS config could not be interpreted.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A section header without a `<kind> <name>` shape.
    #[error("Malformed section header: [{0}]")]
    MalformedSection(String),

    /// An ARN with fewer than six colon-delimited fields.
    #[error("Malformed ARN: {0}")]
    MalformedArn(String),

    /// The same profile name appears in two sections.
    #[error("Duplicate profile definition: {0}")]
    DuplicateProfile(String),

    /// A `source_profile` that names no known profile.
    #[error("Profile {profile} references unknown source profile {source_profile}")]
    UnknownSourceProfile {
        profile: String,
        source_profile: String,
    },

    /// A cross-link lookup found no derived profile with the given name.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Two derived profiles ended up with the same name.
    #[error("Duplicate derived profile name: {0}")]
    DuplicateProfileName(String),

    /// No secret stored under the given label.
    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    /// The secret store backend failed.
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Resolving the caller identity of a key pair failed.
    #[error("Identity lookup failed: {0}")]
    RemoteIdentity(String),

    /// Resolving the account alias of a key pair failed.
    #[error("Account alias lookup failed: {0}")]
    RemoteAlias(String),

    /// A credentials file did not have the expected layout.
    #[error("Invalid credentials file: {0}")]
    Credentials(String),

    /// A kubeconfig document is missing a required field.
    #[error("Invalid kubeconfig: {0}")]
    Kubeconfig(String),

    /// An operation needs a capability that is switched off.
    #[error("Capability disabled: {0}")]
    CapabilityDisabled(&'static str),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether this error means "nothing stored under that label".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SecretNotFound(_))
    }
}

/// Extension for secret lookups where a miss is a normal outcome.
pub trait OptionalSecret<T> {
    /// Maps `SecretNotFound` to `Ok(None)` and passes everything else through.
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalSecret<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
