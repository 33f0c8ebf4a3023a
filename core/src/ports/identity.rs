//! Identity resolver port (interface).

use crate::domain::AccessKeyPair;
use crate::error::Result;

/// Port for resolving who an access key pair belongs to.
///
/// Both calls go to the cloud provider. Failures are returned as
/// `Error::RemoteIdentity` / `Error::RemoteAlias` and are not retried.
pub trait IdentityResolver: Send + Sync {
    /// The ARN of the identity owning `keys`.
    fn resolve_identity(
        &self,
        keys: &AccessKeyPair,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// The first account alias of the account owning `keys`, if it has one.
    fn resolve_account_alias(
        &self,
        keys: &AccessKeyPair,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}
