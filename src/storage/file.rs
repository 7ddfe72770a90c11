use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{LinkChange, ShortLink, ShortLinkRepository, Snapshot, UserAccount};
use crate::errors::{Result, ShortlinkError};

/// JSON-file backed repository.
///
/// The whole [`Snapshot`] lives in memory behind one reader/writer lock.
/// Every mutation rewrites the complete file while still holding the write
/// lock, so readers never see a save in progress. The file is replaced via a
/// temporary sibling and a rename.
pub struct FileRepository {
    file_path: PathBuf,
    state: RwLock<Snapshot>,
}

impl FileRepository {
    /// Load the snapshot at `path`, or create an empty one if the file is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        let snapshot = match Self::read_snapshot(&file_path)? {
            Some(snapshot) => {
                info!(
                    "FileRepository loaded {} users and {} links from {}",
                    snapshot.users.len(),
                    snapshot.links.len(),
                    file_path.display()
                );
                snapshot
            }
            None => {
                info!("存储文件不存在，创建空的存储: {}", file_path.display());
                if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        error!("创建存储目录失败: {}", e);
                        ShortlinkError::storage_failure(format!(
                            "Unable to create storage directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                let empty = Snapshot::default();
                Self::write_snapshot(&file_path, &empty)?;
                empty
            }
        };

        Ok(Self {
            file_path,
            state: RwLock::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_snapshot(path: &Path) -> Result<Option<Snapshot>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                error!("读取存储文件失败: {}", e);
                return Err(ShortlinkError::storage_failure(format!(
                    "Unable to load storage file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str::<Snapshot>(&content)
            .map(Some)
            .map_err(|e| {
                error!("解析存储文件失败: {}", e);
                ShortlinkError::storage_failure(format!(
                    "Unable to parse storage file {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    /// Sibling of `path` with `.tmp` appended to the full file name.
    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }

    fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = Self::tmp_path(path);

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp_path, path)
        };

        write().map_err(|e| {
            error!("持久化存储文件失败: {}", e);
            let _ = fs::remove_file(&tmp_path);
            ShortlinkError::storage_failure(format!(
                "Unable to persist storage file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(
            "Persisted snapshot ({} users, {} links) to {}",
            snapshot.users.len(),
            snapshot.links.len(),
            path.display()
        );
        Ok(())
    }

    /// Run `f` under the write lock; persist before unlocking if it reports a change.
    fn mutate<R>(&self, f: impl FnOnce(&mut Snapshot) -> Result<(R, bool)>) -> Result<R> {
        let mut guard = self.state.write();
        let (result, changed) = f(&mut guard)?;
        if changed {
            Self::write_snapshot(&self.file_path, &guard)?;
        }
        Ok(result)
    }
}

impl ShortLinkRepository for FileRepository {
    fn find_link_by_code(&self, code: &str) -> Option<ShortLink> {
        self.state.read().links.get(code).cloned()
    }

    fn find_links_by_owner(&self, owner_id: Uuid) -> Vec<ShortLink> {
        self.state
            .read()
            .links
            .values()
            .filter(|link| link.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn find_all_links(&self) -> Vec<ShortLink> {
        self.state.read().links.values().cloned().collect()
    }

    fn save_link(&self, link: ShortLink) -> Result<ShortLink> {
        self.mutate(|snapshot| {
            snapshot.links.insert(link.code.clone(), link.clone());
            Ok((link, true))
        })
    }

    fn insert_link(&self, link: ShortLink) -> Result<bool> {
        self.mutate(|snapshot| {
            if snapshot.links.contains_key(&link.code) {
                return Ok((false, false));
            }
            snapshot.links.insert(link.code.clone(), link);
            Ok((true, true))
        })
    }

    fn modify_link(
        &self,
        code: &str,
        apply: &mut dyn FnMut(&mut ShortLink) -> Result<LinkChange>,
    ) -> Result<Option<ShortLink>> {
        self.mutate(|snapshot| {
            let Some(current) = snapshot.links.get(code).cloned() else {
                return Ok((None, false));
            };

            let mut working = current.clone();
            match apply(&mut working)? {
                LinkChange::Keep => Ok((Some(current), false)),
                LinkChange::Save => {
                    // 短码是主键，不允许在回调中被改写
                    working.code = current.code;
                    snapshot.links.insert(code.to_string(), working.clone());
                    Ok((Some(working), true))
                }
                LinkChange::Delete => Ok((snapshot.links.remove(code), true)),
            }
        })
    }

    fn delete_link(&self, code: &str) -> Result<bool> {
        self.mutate(|snapshot| {
            let removed = snapshot.links.remove(code).is_some();
            Ok((removed, removed))
        })
    }

    fn delete_expired(&self, now: DateTime<Utc>) -> Result<Vec<ShortLink>> {
        self.mutate(|snapshot| {
            let expired: Vec<String> = snapshot
                .links
                .values()
                .filter(|link| link.is_expired(now))
                .map(|link| link.code.clone())
                .collect();

            let removed: Vec<ShortLink> = expired
                .iter()
                .filter_map(|code| snapshot.links.remove(code))
                .collect();

            let changed = !removed.is_empty();
            Ok((removed, changed))
        })
    }

    fn save_user(&self, user: UserAccount) -> Result<UserAccount> {
        self.mutate(|snapshot| {
            snapshot.users.insert(user.id, user.clone());
            Ok((user, true))
        })
    }

    fn find_user(&self, id: Uuid) -> Option<UserAccount> {
        self.state.read().users.get(&id).cloned()
    }

    fn find_all_users(&self) -> Vec<UserAccount> {
        self.state.read().users.values().cloned().collect()
    }

    fn snapshot(&self) -> Snapshot {
        self.state.read().clone()
    }

    fn reload(&self) -> Result<()> {
        let mut guard = self.state.write();
        let snapshot = Self::read_snapshot(&self.file_path)?.ok_or_else(|| {
            ShortlinkError::storage_failure(format!(
                "Storage file {} disappeared",
                self.file_path.display()
            ))
        })?;
        *guard = snapshot;
        info!("存储重载完成: {}", self.file_path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
