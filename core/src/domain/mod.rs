//! Domain layer - Pure business logic and data models.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod credentials;
mod definition;
mod profile;
mod template;

// Re-export all domain types
pub use credentials::AccessKeyPair;
pub use definition::{is_production, Arn, ProfileDefinition, ProfileDefinitions};
pub use profile::{
    login_profile_name, Color, ColorSpace, CustomCommand, KeyAction, Profile, Scaffold,
    SmartSelectionAction, SmartSelectionRule, Trigger, LOGIN_SHORTCUT, SOURCE_PROFILE_TAG_PREFIX,
};
pub use template::ProfileTemplate;
