//! Identity resolution using the `aws` command line tool.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::domain::AccessKeyPair;
use crate::error::{Error, Result};
use crate::ports::IdentityResolver;

/// Default paths to search for the aws CLI.
const AWS_PATHS: &[&str] = &[
    "/opt/homebrew/bin/aws", // Apple Silicon
    "/usr/local/bin/aws",    // Intel Mac / Homebrew / bundled installer
    "/usr/bin/aws",          // System
];

/// Timeout for a single aws CLI call.
const AWS_TIMEOUT: Duration = Duration::from_secs(30);

/// Variables that would make the CLI pick credentials other than the given pair.
const SCRUBBED_VARS: &[&str] = &["AWS_PROFILE", "AWS_SESSION_TOKEN", "AWS_DEFAULT_PROFILE"];

/// Response of `aws sts get-caller-identity --output json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CallerIdentity {
    arn: String,
}

/// Response of `aws iam list-account-aliases --output json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountAliases {
    #[serde(default)]
    account_aliases: Vec<String>,
}

/// Resolves identities by running `aws sts` / `aws iam` with the key pair
/// in the environment.
pub struct AwsCliIdentityResolver {
    aws_path: Option<PathBuf>,
}

impl AwsCliIdentityResolver {
    /// Creates a resolver, searching for the aws CLI.
    pub fn new() -> Self {
        Self {
            aws_path: find_executable(AWS_PATHS),
        }
    }

    /// Creates a resolver with a custom aws CLI path.
    pub fn with_path(aws_path: Option<PathBuf>) -> Self {
        Self { aws_path }
    }

    pub fn aws_path(&self) -> Option<&PathBuf> {
        self.aws_path.as_ref()
    }

    /// Returns true if the aws CLI is available.
    pub fn is_available(&self) -> bool {
        self.aws_path.is_some()
    }

    /// Runs the aws CLI with `keys` as the only credentials and returns stdout.
    async fn execute_aws(
        &self,
        keys: &AccessKeyPair,
        args: &[&str],
    ) -> std::result::Result<String, String> {
        let aws_path = self
            .aws_path
            .as_ref()
            .ok_or_else(|| "aws CLI not found".to_string())?;

        let mut command = Command::new(aws_path);
        command
            .args(args)
            .args(["--output", "json"])
            .env("AWS_ACCESS_KEY_ID", &keys.access_key_id)
            .env("AWS_SECRET_ACCESS_KEY", &keys.secret_access_key);
        for var in SCRUBBED_VARS {
            command.env_remove(var);
        }

        debug!(?args, access_key_id = %keys.access_key_id, "running aws CLI");

        let result = timeout(AWS_TIMEOUT, async {
            let output = command.output().await?;

            Ok::<_, std::io::Error>((output.status, output.stdout, output.stderr))
        })
        .await;

        match result {
            Ok(Ok((status, stdout, stderr))) => {
                if status.success() {
                    String::from_utf8(stdout).map_err(|e| e.to_string())
                } else {
                    Err(String::from_utf8_lossy(&stderr).trim().to_string())
                }
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}s", AWS_TIMEOUT.as_secs())),
        }
    }
}

impl Default for AwsCliIdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver for AwsCliIdentityResolver {
    async fn resolve_identity(&self, keys: &AccessKeyPair) -> Result<String> {
        let output = self
            .execute_aws(keys, &["sts", "get-caller-identity"])
            .await
            .map_err(Error::RemoteIdentity)?;
        parse_caller_identity(&output)
    }

    async fn resolve_account_alias(&self, keys: &AccessKeyPair) -> Result<Option<String>> {
        let output = self
            .execute_aws(keys, &["iam", "list-account-aliases"])
            .await
            .map_err(Error::RemoteAlias)?;
        parse_account_aliases(&output)
    }
}

fn parse_caller_identity(output: &str) -> Result<String> {
    let identity: CallerIdentity =
        serde_json::from_str(output).map_err(|e| Error::RemoteIdentity(e.to_string()))?;
    Ok(identity.arn)
}

fn parse_account_aliases(output: &str) -> Result<Option<String>> {
    let aliases: AccountAliases =
        serde_json::from_str(output).map_err(|e| Error::RemoteAlias(e.to_string()))?;
    Ok(aliases.account_aliases.into_iter().next())
}

/// Finds an executable in the given paths.
fn find_executable(paths: &[&str]) -> Option<PathBuf> {
    paths.iter().map(PathBuf::from).find(|path| path.exists())
}
