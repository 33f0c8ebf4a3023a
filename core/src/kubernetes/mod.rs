//! Kubernetes module for kubeconfig-based profiles.
//!
//! This module provides:
//! - Kubeconfig discovery and tolerant field extraction
//! - One profile per cluster context, linked to the AWS login profile
//!   of the AWS profile the cluster authenticates with

pub mod builder;
pub mod kubeconfig;

// Re-export commonly used types
pub use builder::{extract_relationship_tag, find_by_name, find_source_profile, K8sProfileBuilder};
pub use kubeconfig::{load_kubeconfigs, Kubeconfig};
