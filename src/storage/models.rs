use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. The id is the only credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub code: String,
    pub owner_id: Uuid,
    pub original_url: String,
    pub max_visits: u32,
    #[serde(default)]
    pub visit_count: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ShortLink {
    /// 过期判断包含边界：`now == expires_at` 即视为过期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.visit_count >= self.max_visits
    }

    pub fn remaining_visits(&self) -> u32 {
        self.max_visits.saturating_sub(self.visit_count)
    }
}

/// The full persisted state: every user and every link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: HashMap<Uuid, UserAccount>,
    #[serde(default, alias = "shortLinks")]
    pub links: HashMap<String, ShortLink>,
}

/// What a [`modify_link`](super::ShortLinkRepository::modify_link) callback
/// decided to do with the link it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    /// Discard the working copy, nothing is persisted.
    Keep,
    /// Store the working copy and persist.
    Save,
    /// Remove the link and persist.
    Delete,
}
