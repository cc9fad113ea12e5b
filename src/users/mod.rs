/// User store
///
/// Read-only access to the externally owned user records that credentials
/// are checked against.

mod memory;
mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// A stored user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Public view of a user, safe to return from handlers
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// Lookup interface over the user data store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}
