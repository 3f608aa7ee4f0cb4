//! In-memory user directory
//!
//! Holds the set of board members the smart-assign planner draws from and
//! that requests are attributed to. Session issuance and credentials live in
//! the external auth layer; this directory only knows ids and usernames.

use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::error::BoardError;
use crate::models::User;

pub struct UserDirectory {
    users: RwLock<Vec<User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    /// Register a new user. Usernames are unique; ids are server-allocated.
    pub fn add(&self, username: &str) -> Result<User, BoardError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(BoardError::Validation("Username must not be empty".to_string()));
        }

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.iter().any(|user| user.username == username) {
            return Err(BoardError::DuplicateUsername(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    pub fn get(&self, id: &str) -> Option<User> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.iter().find(|user| user.id == id).cloned()
    }

    /// All users in registration order.
    pub fn all(&self) -> Vec<User> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.clone()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
