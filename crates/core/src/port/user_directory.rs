// User Directory Port (Interface)

use crate::domain::UserId;
use crate::error::Result;
use async_trait::async_trait;

/// Lookup against the identity mirror.
///
/// Authentication itself happens in an external identity layer; the core
/// only needs an existence check for add-admin targets.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, user_id: &UserId) -> Result<bool>;
}
