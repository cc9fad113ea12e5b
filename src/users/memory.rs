use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::{User, UserStore};
use crate::configuration::SeedUser;
use crate::error::AppError;

/// User store held entirely in memory, built once at startup
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    by_username: HashMap<String, User>,
    by_id: HashMap<Uuid, String>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `user_store.users` configuration list
    pub fn from_seed(seed: &[SeedUser]) -> Self {
        seed.iter().fold(Self::new(), |store, user| {
            store.with_user(User {
                id: user.id.unwrap_or_else(Uuid::new_v4),
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                role: user.role.clone(),
            })
        })
    }

    /// Add a user; a later entry with the same username replaces the earlier one
    pub fn with_user(mut self, user: User) -> Self {
        if let Some(previous) = self.by_username.get(&user.username) {
            self.by_id.remove(&previous.id);
        }
        self.by_id.insert(user.id, user.username.clone());
        self.by_username.insert(user.username.clone(), user);
        self
    }

    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.by_username.get(username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .by_id
            .get(&id)
            .and_then(|username| self.by_username.get(username))
            .cloned())
    }
}
