//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod identity;
mod secret_store;

pub use identity::IdentityResolver;
pub use secret_store::SecretStore;
