//! Link lifecycle service
//!
//! The only component that mutates links. Creation, visits, updates and
//! deletions all go through the repository so that every change is persisted
//! under the store's lock before the call returns.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use strum::AsRefStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{DEFAULT_DOMAIN, LinkConfig};
use crate::errors::{Result, ShortlinkError};
use crate::storage::{LinkChange, ShortLink, ShortLinkRepository};
use crate::system::{BrowserOpener, Notifier};
use crate::utils::url_validator::validate_url;
use crate::utils::{extract_code, generate_random_code, normalize_domain};

// ============ Visit outcome ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Success,
    NotFound,
    Expired,
    LimitReached,
}

/// Result of a visit attempt.
///
/// Expected business outcomes are values, not errors. Every variant except
/// `NotFound` carries the link as it was when the visit was decided
/// (for `Success`, after the counter increment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    NotFound,
    Expired(ShortLink),
    LimitReached(ShortLink),
    Success(ShortLink),
}

impl VisitOutcome {
    pub fn status(&self) -> VisitStatus {
        match self {
            VisitOutcome::NotFound => VisitStatus::NotFound,
            VisitOutcome::Expired(_) => VisitStatus::Expired,
            VisitOutcome::LimitReached(_) => VisitStatus::LimitReached,
            VisitOutcome::Success(_) => VisitStatus::Success,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            VisitOutcome::NotFound => "Short link not found",
            VisitOutcome::Expired(_) => "Link expired",
            VisitOutcome::LimitReached(_) => "Visit limit reached",
            VisitOutcome::Success(_) => "OK",
        }
    }

    pub fn link(&self) -> Option<&ShortLink> {
        match self {
            VisitOutcome::NotFound => None,
            VisitOutcome::Expired(link)
            | VisitOutcome::LimitReached(link)
            | VisitOutcome::Success(link) => Some(link),
        }
    }

    /// Destination URL, only for a successful visit.
    pub fn destination(&self) -> Option<&str> {
        match self {
            VisitOutcome::Success(link) => Some(&link.original_url),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, VisitOutcome::Success(_))
    }
}

// ============ LinkService Implementation ============

/// Service for link lifecycle operations
pub struct LinkService {
    repository: Arc<dyn ShortLinkRepository>,
    notifier: Arc<dyn Notifier>,
    browser: Arc<dyn BrowserOpener>,
    domain: String,
    code_length: usize,
    ttl: chrono::Duration,
    open_browser: bool,
}

impl LinkService {
    pub fn new(
        config: &LinkConfig,
        repository: Arc<dyn ShortLinkRepository>,
        notifier: Arc<dyn Notifier>,
        browser: Arc<dyn BrowserOpener>,
    ) -> Self {
        Self {
            repository,
            notifier,
            browser,
            domain: normalize_domain(&config.domain, DEFAULT_DOMAIN),
            code_length: config.code_length,
            ttl: config.default_ttl(),
            open_browser: config.open_browser,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn expires_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    // ============ Lifecycle Operations ============

    /// Create a new short link owned by `owner_id`
    pub fn create_short_link(&self, owner_id: Uuid, url: &str, max_visits: u32) -> Result<ShortLink> {
        if self.repository.find_user(owner_id).is_none() {
            return Err(ShortlinkError::not_found("User not found"));
        }

        validate_url(url).map_err(|e| ShortlinkError::invalid_input(e.to_string()))?;

        if max_visits == 0 {
            return Err(ShortlinkError::invalid_input("Visit limit must be positive"));
        }

        let now = Utc::now();
        let mut link = ShortLink {
            code: String::new(),
            owner_id,
            original_url: url.trim().to_string(),
            max_visits,
            visit_count: 0,
            created_at: now,
            expires_at: self.expires_from(now),
        };

        // 重复直到找到未占用的短码
        let mut attempts: u64 = 0;
        loop {
            link.code = generate_random_code(self.code_length)?;
            attempts += 1;
            if self.repository.insert_link(link.clone())? {
                break;
            }
            debug!(
                "LinkService: code '{}' already taken (attempt {}), retrying",
                link.code, attempts
            );
        }

        info!(
            "LinkService: created '{}' -> '{}' (owner {}, limit {})",
            link.code, link.original_url, owner_id, max_visits
        );
        Ok(link)
    }

    /// Follow a short link given as a bare code or a full short URL.
    ///
    /// Priority: unknown code, expired (the link is deleted), exhausted,
    /// then a counted visit.
    pub fn visit(&self, raw_input: &str) -> Result<VisitOutcome> {
        let code = extract_code(raw_input)?;
        let now = Utc::now();

        let mut status = VisitStatus::NotFound;
        let touched = self
            .repository
            .modify_link(&code, &mut |link: &mut ShortLink| {
                if link.is_expired(now) {
                    status = VisitStatus::Expired;
                    return Ok(LinkChange::Delete);
                }
                if link.is_exhausted() {
                    status = VisitStatus::LimitReached;
                    return Ok(LinkChange::Keep);
                }
                link.visit_count += 1;
                status = VisitStatus::Success;
                Ok(LinkChange::Save)
            })?;

        let outcome = match (status, touched) {
            (VisitStatus::Expired, Some(link)) => VisitOutcome::Expired(link),
            (VisitStatus::LimitReached, Some(link)) => VisitOutcome::LimitReached(link),
            (VisitStatus::Success, Some(link)) => VisitOutcome::Success(link),
            _ => VisitOutcome::NotFound,
        };

        match &outcome {
            VisitOutcome::NotFound => {
                debug!("LinkService: visit to unknown code '{}'", code);
                self.notifier.warning("Short link not found.");
            }
            VisitOutcome::Expired(_) => {
                info!("LinkService: '{}' expired, removed on visit", code);
                self.notifier.warning("Link expired and removed.");
            }
            VisitOutcome::LimitReached(_) => {
                debug!("LinkService: '{}' reached its visit limit", code);
                self.notifier.warning("Visit limit reached for this link.");
            }
            VisitOutcome::Success(link) => {
                debug!(
                    "LinkService: visit {}/{} on '{}'",
                    link.visit_count, link.max_visits, code
                );
                self.notifier.info("Redirecting to original URL...");
                self.open_in_browser(&link.original_url);
            }
        }

        Ok(outcome)
    }

    fn open_in_browser(&self, url: &str) {
        if !self.open_browser {
            return;
        }
        if let Err(e) = self.browser.open(url) {
            warn!("LinkService: failed to open browser for '{}': {:#}", url, e);
            self.notifier.error(&format!("Failed to open browser: {}", e));
        }
    }

    /// Delete a link owned by `owner_id`.
    ///
    /// Returns `false` if the code does not exist.
    pub fn delete_short_link(&self, owner_id: Uuid, code_or_url: &str) -> Result<bool> {
        let code = extract_code(code_or_url)?;

        let removed = self
            .repository
            .modify_link(&code, &mut |link: &mut ShortLink| {
                if link.owner_id != owner_id {
                    return Err(ShortlinkError::forbidden(
                        "You can delete only your own links",
                    ));
                }
                Ok(LinkChange::Delete)
            })?;

        if removed.is_some() {
            info!("LinkService: deleted '{}'", code);
        }
        Ok(removed.is_some())
    }

    /// Change the visit limit and/or restart the TTL of a link.
    pub fn update_short_link(
        &self,
        owner_id: Uuid,
        code_or_url: &str,
        new_max_visits: Option<u32>,
        refresh_ttl: bool,
    ) -> Result<ShortLink> {
        if new_max_visits.is_none() && !refresh_ttl {
            return Err(ShortlinkError::invalid_input(
                "Nothing to update: provide a new visit limit or refresh the TTL",
            ));
        }

        let code = extract_code(code_or_url)?;
        let now = Utc::now();
        let new_expires_at = self.expires_from(now);

        let mut expired = false;
        let updated = self
            .repository
            .modify_link(&code, &mut |link: &mut ShortLink| {
                if link.owner_id != owner_id {
                    return Err(ShortlinkError::forbidden(
                        "You can update only your own links",
                    ));
                }
                // 已过期的链接是终态：由所有者触碰时删除，不会被刷新复活
                if link.is_expired(now) {
                    expired = true;
                    return Ok(LinkChange::Delete);
                }
                if let Some(max_visits) = new_max_visits {
                    if max_visits == 0 {
                        return Err(ShortlinkError::invalid_input(
                            "Visit limit must be positive",
                        ));
                    }
                    if max_visits < link.visit_count {
                        return Err(ShortlinkError::invalid_input(format!(
                            "Visit limit cannot be lower than the current visit count ({})",
                            link.visit_count
                        )));
                    }
                    link.max_visits = max_visits;
                }
                if refresh_ttl {
                    link.expires_at = new_expires_at;
                }
                Ok(LinkChange::Save)
            })?;

        match updated {
            Some(_) if expired => {
                info!("LinkService: '{}' expired, removed on update", code);
                Err(ShortlinkError::not_found(format!(
                    "Short link '{}' has expired",
                    code
                )))
            }
            Some(link) => {
                info!(
                    "LinkService: updated '{}' (limit {}, expires {})",
                    code, link.max_visits, link.expires_at
                );
                Ok(link)
            }
            None => Err(ShortlinkError::not_found(format!(
                "Short link '{}' not found",
                code
            ))),
        }
    }

    /// Look a link up without touching it.
    pub fn find_link(&self, code_or_url: &str) -> Result<Option<ShortLink>> {
        let code = extract_code(code_or_url)?;
        Ok(self.repository.find_link_by_code(&code))
    }

    /// All links owned by `owner_id`, in no particular order
    pub fn list_links(&self, owner_id: Uuid) -> Vec<ShortLink> {
        self.repository.find_links_by_owner(owner_id)
    }

    /// Delete every link expired as of now and return them.
    pub fn remove_expired(&self) -> Result<Vec<ShortLink>> {
        let removed = self.repository.delete_expired(Utc::now())?;
        if !removed.is_empty() {
            info!("LinkService: removed {} expired links", removed.len());
        }
        Ok(removed)
    }

    pub fn to_full_short_url(&self, code: &str) -> String {
        format!("{}{}", self.domain, code)
    }
}
