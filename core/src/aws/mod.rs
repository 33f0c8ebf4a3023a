//! AWS configuration: parsing, sorting and profile derivation.
//!
//! This module provides:
//! - A reader for the `~/.aws/config` INI dialect
//! - The two-pass derivation of primary and login profiles
//! - Idempotent alphabetical sorting of config files

pub mod derivation;
pub mod ini;
pub mod reader;
pub mod sort;

// Re-export commonly used types
pub use derivation::ProfileDerivationEngine;
pub use ini::IniDocument;
pub use reader::AwsConfigReader;
pub use sort::{sort_config, sort_file};
