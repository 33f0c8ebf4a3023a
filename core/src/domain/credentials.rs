//! Static AWS access keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::environment::shell_quote;
use crate::error::{Error, Result};

/// Column of the access key id in a console credentials CSV.
const ACCESS_KEY_COLUMN: usize = 2;

/// Column of the secret access key in a console credentials CSV.
const SECRET_KEY_COLUMN: usize = 3;

/// An access key id and its secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyPair {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl AccessKeyPair {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read the key pair from a credentials CSV downloaded from the console.
    ///
    /// The first line is the header; the keys are columns 2 and 3 of the
    /// second line.
    pub fn from_credentials_csv(source: &str) -> Result<Self> {
        let row = source
            .lines()
            .nth(1)
            .ok_or_else(|| Error::Credentials("expected a header and a data row".to_string()))?;
        let columns: Vec<&str> = row.split(',').map(str::trim).collect();

        let column = |idx: usize, what: &str| {
            columns
                .get(idx)
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
                .ok_or_else(|| Error::Credentials(format!("missing {} in column {}", what, idx)))
        };

        Ok(Self {
            access_key_id: column(ACCESS_KEY_COLUMN, "access key id")?,
            secret_access_key: column(SECRET_KEY_COLUMN, "secret access key")?,
        })
    }

    /// Shell statements exporting the pair.
    pub fn export_script(&self) -> String {
        format!(
            "export AWS_ACCESS_KEY_ID={}\nexport AWS_SECRET_ACCESS_KEY={}\n",
            shell_quote(&self.access_key_id),
            shell_quote(&self.secret_access_key)
        )
    }
}

impl fmt::Debug for AccessKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyPair")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}
