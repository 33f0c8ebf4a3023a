//! Application layer - Use case services.
//!
//! Services orchestrate domain logic and adapters:
//! - Accept domain types and settings as inputs
//! - Use ports (traits) for the secret store and identity lookups
//! - Return domain types as outputs

mod capabilities;
mod generator;
mod secret_profiles;
mod vault;

pub use capabilities::Capabilities;
pub use generator::ProfileGenerator;
pub use secret_profiles::{export_command, SecretBackedProfileBuilder};
pub use vault::{CredentialVault, KNOWN_IDENTITIES_LABEL};
