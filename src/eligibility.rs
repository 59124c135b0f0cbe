//! Eligibility refresh collaborators.
//!
//! Two independent recomputations own the denormalized fields on the user
//! record: role eligibility (NFT holdings, Discord membership) and social
//! follow status. Their internals live outside this service; the auth core
//! only depends on the call contract below. Both calls are assumed
//! idempotent and confined to writes on the user record.

use crate::models::StoredUser;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Upstream refresh failed: {0}")]
    Upstream(String),
}

/// Contract the current-user read path depends on.
///
/// Callers invoke the two refreshes sequentially and re-read the user
/// record afterwards; failures abort the read with no retry.
#[async_trait]
pub trait EligibilityRefresher: Send + Sync {
    /// Recompute role eligibility (NFT count, Discord membership) for one user.
    async fn refresh_role_eligibility(&self, user: &StoredUser) -> Result<(), RefreshError>;

    /// Recompute social follow status (Twitter) for one user.
    async fn refresh_social_follows(&self, user: &StoredUser) -> Result<(), RefreshError>;
}

/// Refresher for deployments without the recomputation workers.
///
/// Leaves the user record untouched; the profile endpoint then serves
/// whatever the workers last wrote.
pub struct NoopRefresher;

#[async_trait]
impl EligibilityRefresher for NoopRefresher {
    async fn refresh_role_eligibility(&self, user: &StoredUser) -> Result<(), RefreshError> {
        tracing::debug!(wallet = %user.wallet_address, "No role eligibility refresher configured");
        Ok(())
    }

    async fn refresh_social_follows(&self, user: &StoredUser) -> Result<(), RefreshError> {
        tracing::debug!(wallet = %user.wallet_address, "No social follow refresher configured");
        Ok(())
    }
}
