//! Kubeconfig loading and field extraction.
//!
//! Documents are kept as untyped YAML: only `current-context` and the
//! first user's exec environment are read, and any other shape is
//! tolerated.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A kubeconfig document and the file it was read from.
#[derive(Debug, Clone)]
pub struct Kubeconfig {
    pub path: PathBuf,
    pub document: Value,
}

impl Kubeconfig {
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        Ok(Self {
            path: path.into(),
            document: serde_yaml::from_str(source)?,
        })
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::parse(path, &content)
    }
}

/// The `current-context` of a kubeconfig document.
pub fn current_context(document: &Value) -> Result<&str> {
    document
        .get("current-context")
        .and_then(Value::as_str)
        .filter(|context| !context.is_empty())
        .ok_or_else(|| Error::Kubeconfig("missing current-context".to_string()))
}

/// The `AWS_PROFILE` set in `users[0].user.exec.env`, if any.
pub fn aws_profile(document: &Value) -> Option<&str> {
    document
        .get("users")?
        .get(0)?
        .get("user")?
        .get("exec")?
        .get("env")?
        .as_sequence()?
        .iter()
        .find(|var| var.get("name").and_then(Value::as_str) == Some("AWS_PROFILE"))?
        .get("value")?
        .as_str()
}

/// Load every kubeconfig in `paths`, then every regular file in `dir`.
///
/// Files that cannot be read or parsed are skipped with a warning.
/// Hidden files in `dir` are ignored and the rest are loaded in name order.
pub async fn load_kubeconfigs(paths: &[PathBuf], dir: Option<&Path>) -> Vec<Kubeconfig> {
    let mut candidates = paths.to_vec();
    if let Some(dir) = dir {
        candidates.extend(list_dir(dir).await);
    }

    let mut configs = Vec::with_capacity(candidates.len());
    for path in candidates {
        match Kubeconfig::read(&path).await {
            Ok(config) => configs.push(config),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping kubeconfig"),
        }
    }
    configs
}

async fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "kube directory not readable");
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                let is_file = entry
                    .file_type()
                    .await
                    .map(|t| t.is_file())
                    .unwrap_or(false);
                if is_file && !hidden {
                    files.push(entry.path());
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "error listing kube directory");
                break;
            }
        }
    }

    files.sort();
    files
}

#[cfg(test)]
pub(crate) fn cluster_config(name: &str, aws_profile: &str) -> String {
    format!(
        "apiVersion: v1
clusters:
- cluster:
    certificate-authority-data: certificate-authority-data
    server: server
  name: {name}-name
contexts:
- context:
    cluster: {name}-name
    user: {name}-user
  name: {name}-name
current-context: {name}-name
kind: Config
preferences: {{}}
users:
- name: {name}-user
  user:
    exec:
      apiVersion: client.authentication.k8s.io/v1alpha1
      args:
      - token
      - -i
      - data
      command: aws-iam-authenticator
      env:
      - name: AWS_PROFILE
        value: {aws_profile}
"
    )
}
