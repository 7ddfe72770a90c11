use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::{Result, ShortlinkError};
use crate::storage::{ShortLinkRepository, UserAccount};

/// Registration and lookup of users
pub struct UserService {
    repository: Arc<dyn ShortLinkRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn ShortLinkRepository>) -> Self {
        Self { repository }
    }

    pub fn register_new_user(&self) -> Result<UserAccount> {
        let account = UserAccount::new(Uuid::new_v4(), Utc::now());
        let account = self.repository.save_user(account)?;
        info!("UserService: registered user {}", account.id);
        Ok(account)
    }

    pub fn find_user(&self, user_id: Uuid) -> Option<UserAccount> {
        self.repository.find_user(user_id)
    }

    /// Resolve a user from its textual UUID.
    pub fn login(&self, raw_id: &str) -> Result<UserAccount> {
        let user_id = parse_user_id(raw_id)?;
        self.find_user(user_id)
            .ok_or_else(|| ShortlinkError::not_found("User not found"))
    }

    pub fn list_users(&self) -> Vec<UserAccount> {
        self.repository.find_all_users()
    }
}

pub fn parse_user_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ShortlinkError::invalid_input("Invalid UUID format"))
}
