//! Revoked-token denylist.
//!
//! A jti only needs to stay listed until the token it names would have expired
//! anyway, so every entry carries its own TTL and is evicted afterwards.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use crate::error::RevocationError;

/// Entries never live shorter than this, so a token revoked in its final
/// second cannot slip through on a worker with a slightly lagging clock.
const MIN_REVOCATION_TTL: Duration = Duration::from_secs(1);

/// Denylist of revoked token ids, shared by every worker.
///
/// Implementations must make an `add` visible to every later `contains`,
/// on any worker.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `jti` as revoked for `ttl`. Adding an already revoked jti succeeds.
    async fn add(&self, jti: &str, ttl: Duration) -> Result<(), RevocationError>;

    async fn contains(&self, jti: &str) -> Result<bool, RevocationError>;
}

/// Per-entry expiry: the value stored for a jti is its TTL.
struct RevocationExpiry;

impl Expiry<String, Duration> for RevocationExpiry {
    fn expire_after_create(&self, _jti: &String, ttl: &Duration, _created_at: Instant) -> Option<Duration> {
        Some(*ttl)
    }
}

/// In-process denylist on a moka cache.
///
/// No capacity bound: evicting a live entry early would silently un-revoke a
/// token, so size is bounded only by the TTLs.
#[derive(Clone)]
pub struct MokaRevocationStore {
    revoked: Cache<String, Duration>,
}

impl MokaRevocationStore {
    pub fn new() -> Self {
        Self {
            revoked: Cache::builder().expire_after(RevocationExpiry).build(),
        }
    }
}

impl Default for MokaRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for MokaRevocationStore {
    async fn add(&self, jti: &str, ttl: Duration) -> Result<(), RevocationError> {
        let ttl = ttl.max(MIN_REVOCATION_TTL);
        self.revoked.insert(jti.to_string(), ttl).await;
        tracing::debug!(jti = jti, ttl_secs = ttl.as_secs(), "Token id added to denylist");
        Ok(())
    }

    async fn contains(&self, jti: &str) -> Result<bool, RevocationError> {
        Ok(self.revoked.get(jti).await.is_some())
    }
}
