//! Process environment consulted when building shell commands.
//!
//! Resolved once at startup and passed to the builders explicitly.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Shell used when `SHELL` is unset.
const DEFAULT_SHELL: &str = "/bin/zsh";

/// Environment variable that overrides the CA bundle used by AWS tooling.
pub const CA_BUNDLE_VAR: &str = "AWS_CA_BUNDLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellEnvironment {
    /// Login user for `/usr/bin/login`.
    pub user: String,
    pub home: PathBuf,
    pub shell: String,
    /// CA bundle override propagated into federated login commands.
    pub ca_bundle: Option<String>,
}

impl ShellEnvironment {
    /// Read the current process environment.
    pub fn from_env() -> Result<Self> {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .map_err(|_| Error::Config("Could not determine the current user".to_string()))?;
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        let shell = std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string());
        let ca_bundle = std::env::var(CA_BUNDLE_VAR).ok().filter(|v| !v.is_empty());

        Ok(Self {
            user,
            home,
            shell,
            ca_bundle,
        })
    }

    /// `/usr/bin/login` running `argv` with `vars` set through `/usr/bin/env`.
    pub fn login_command(&self, vars: &[(&str, &str)], argv: &[&str]) -> String {
        let mut parts: Vec<Cow<'_, str>> = vec![
            Cow::Borrowed("/usr/bin/login"),
            Cow::Borrowed("-fpq"),
            shell_quote(&self.user),
            Cow::Borrowed("/usr/bin/env"),
        ];
        parts.extend(
            vars.iter()
                .map(|(name, value)| Cow::Owned(format!("{}={}", name, shell_quote(value)))),
        );
        parts.extend(argv.iter().map(|arg| shell_quote(arg)));
        parts.join(" ")
    }

    /// An interactive login shell with `vars` set.
    pub fn login_shell(&self, vars: &[(&str, &str)]) -> String {
        self.login_command(vars, &[self.shell.as_str(), "--login"])
    }
}

/// Single-quote `value` unless it only contains characters that are safe unquoted.
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@,+%".contains(c));
    if safe {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}

#[cfg(test)]
pub(crate) fn test_environment() -> ShellEnvironment {
    ShellEnvironment {
        user: "tester".to_string(),
        home: PathBuf::from("/Users/tester"),
        shell: "/bin/zsh".to_string(),
        ca_bundle: None,
    }
}
