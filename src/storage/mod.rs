use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::Result;

pub mod file;
pub mod models;

pub use file::FileRepository;
pub use models::{LinkChange, ShortLink, Snapshot, UserAccount};

/// Storage seam for users and links.
///
/// Reads hand out independent copies; every mutation is persisted before the
/// call returns. Implementations must be safe for concurrent callers.
pub trait ShortLinkRepository: Send + Sync {
    fn find_link_by_code(&self, code: &str) -> Option<ShortLink>;
    fn find_links_by_owner(&self, owner_id: Uuid) -> Vec<ShortLink>;
    fn find_all_links(&self) -> Vec<ShortLink>;

    /// Upsert by code.
    fn save_link(&self, link: ShortLink) -> Result<ShortLink>;

    /// Insert only if the code is free. Returns `false` on collision.
    fn insert_link(&self, link: ShortLink) -> Result<bool>;

    /// Read-check-write a single link atomically.
    ///
    /// `apply` receives a working copy. Returning [`LinkChange::Save`] stores
    /// the copy, [`LinkChange::Delete`] removes the link, [`LinkChange::Keep`]
    /// or an error leave the stored link untouched. The returned link is the
    /// saved copy, the removed link, or the unchanged link respectively;
    /// `None` means the code does not exist.
    fn modify_link(
        &self,
        code: &str,
        apply: &mut dyn FnMut(&mut ShortLink) -> Result<LinkChange>,
    ) -> Result<Option<ShortLink>>;

    /// Returns `true` iff a link existed and was removed.
    fn delete_link(&self, code: &str) -> Result<bool>;

    /// Remove and return every link with `expires_at <= now`.
    fn delete_expired(&self, now: DateTime<Utc>) -> Result<Vec<ShortLink>>;

    fn save_user(&self, user: UserAccount) -> Result<UserAccount>;
    fn find_user(&self, id: Uuid) -> Option<UserAccount>;
    fn find_all_users(&self) -> Vec<UserAccount>;

    fn snapshot(&self) -> Snapshot;
    fn reload(&self) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// 打开（或初始化）基于文件的存储
    pub fn create(path: impl AsRef<Path>) -> Result<Arc<dyn ShortLinkRepository>> {
        let repository = FileRepository::open(path)?;
        Ok(Arc::new(repository))
    }
}
