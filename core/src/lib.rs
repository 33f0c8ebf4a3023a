//! iterme Core Library
//!
//! Generates iTerm2 Dynamic Profiles for cloud and cluster access.
//! Provides functionality to:
//! - Derive terminal profiles from an AWS config file
//! - Build one profile per kubeconfig, linked to its AWS login profile
//! - Keep static access keys in the OS keychain and build profiles for them
//! - Sort AWS config files
//! - Manage user configuration (paths, enabled integrations)
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod aws;
pub mod config;
pub mod environment;
pub mod error;
pub mod kubernetes;

// Re-export domain types (primary API)
pub use domain::{AccessKeyPair, Arn, Profile, ProfileDefinition, ProfileDefinitions, ProfileTemplate};

// Re-export other commonly used types
pub use application::{Capabilities, CredentialVault, ProfileGenerator, SecretBackedProfileBuilder};
pub use config::{ConfigStore, Settings};
pub use environment::ShellEnvironment;
pub use error::{Error, Result};
