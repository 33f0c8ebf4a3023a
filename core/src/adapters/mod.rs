//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with external systems.

pub mod aws_cli;
pub mod keychain;
pub mod memory;
pub mod profile_writer;

// Re-export main types for convenience
pub use aws_cli::AwsCliIdentityResolver;
pub use keychain::KeyringSecretStore;
pub use memory::MemorySecretStore;
pub use profile_writer::{DynamicProfiles, DynamicProfilesWriter};
