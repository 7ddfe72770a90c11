//! LinkService integration tests
//!
//! Exercise the link lifecycle against a real file store in a temp directory.

use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use shortlinks::config::AppConfig;
use shortlinks::errors::ShortlinkError;
use shortlinks::runtime::lifetime::startup::AppContext;
use shortlinks::services::{VisitOutcome, VisitStatus};
use shortlinks::storage::{FileRepository, ShortLinkRepository};
use shortlinks::system::{BrowserOpener, NoopBrowser, Notifier, SilentNotifier};
use tempfile::TempDir;
use uuid::Uuid;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn contains(&self, level: &str, message: &str) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|(l, m)| l == level && m == message)
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.messages.lock().push(("info".into(), message.into()));
    }
    fn warning(&self, message: &str) {
        self.messages.lock().push(("warning".into(), message.into()));
    }
    fn error(&self, message: &str) {
        self.messages.lock().push(("error".into(), message.into()));
    }
}

#[derive(Default)]
struct RecordingBrowser {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl BrowserOpener for RecordingBrowser {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("no display");
        }
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

struct TestEnv {
    ctx: AppContext,
    repository: Arc<FileRepository>,
    _temp_dir: TempDir,
}

fn setup_with(
    config: AppConfig,
    notifier: Arc<dyn Notifier>,
    browser: Arc<dyn BrowserOpener>,
) -> TestEnv {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repository = Arc::new(
        FileRepository::open(temp_dir.path().join("store.json"))
            .expect("Failed to create storage"),
    );
    let ctx = AppContext::from_repository(&config, repository.clone(), notifier, browser);
    TestEnv {
        ctx,
        repository,
        _temp_dir: temp_dir,
    }
}

fn setup() -> TestEnv {
    setup_with(
        AppConfig::default(),
        Arc::new(SilentNotifier),
        Arc::new(NoopBrowser),
    )
}

fn register(env: &TestEnv) -> Uuid {
    env.ctx.user_service.register_new_user().unwrap().id
}

// =============================================================================
// create_short_link
// =============================================================================

#[test]
fn test_create_sets_expiry_and_counter() {
    let env = setup();
    let owner = register(&env);
    let before = Utc::now();

    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com/a", 5)
        .unwrap();

    assert_eq!(link.code.len(), 7);
    assert!(link.code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(link.visit_count, 0);
    assert_eq!(link.max_visits, 5);
    assert_eq!(link.owner_id, owner);
    assert!(link.expires_at >= before + Duration::hours(24));
    assert!(link.expires_at <= Utc::now() + Duration::hours(24));
    assert_eq!(env.repository.find_link_by_code(&link.code), Some(link));
}

#[test]
fn test_identical_urls_get_distinct_codes() {
    let env = setup();
    let alice = register(&env);
    let bob = register(&env);

    let a = env
        .ctx
        .link_service
        .create_short_link(alice, "https://example.com", 1)
        .unwrap();
    let b = env
        .ctx
        .link_service
        .create_short_link(bob, "https://example.com", 1)
        .unwrap();

    assert_ne!(a.code, b.code);
}

#[test]
fn test_codes_unique_with_tiny_code_space() {
    let mut config = AppConfig::default();
    config.links.code_length = 1;
    let env = setup_with(config, Arc::new(SilentNotifier), Arc::new(NoopBrowser));
    let owner = register(&env);

    // 62 个单字符短码里取 30 个，必然触发碰撞重试
    let mut codes: Vec<String> = (0..30)
        .map(|_| {
            env.ctx
                .link_service
                .create_short_link(owner, "https://example.com", 1)
                .unwrap()
                .code
        })
        .collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 30);
}

#[test]
fn test_create_validation_order() {
    let env = setup();
    let owner = register(&env);
    let service = &env.ctx.link_service;

    assert!(matches!(
        service.create_short_link(Uuid::new_v4(), "not a url", 0),
        Err(ShortlinkError::NotFound(_))
    ));
    assert!(matches!(
        service.create_short_link(owner, "not a url", 0),
        Err(ShortlinkError::InvalidInput(_))
    ));
    assert!(matches!(
        service.create_short_link(owner, "mailto:a@b.c", 1),
        Err(ShortlinkError::InvalidInput(_))
    ));
    assert!(matches!(
        service.create_short_link(owner, "https://example.com", 0),
        Err(ShortlinkError::InvalidInput(_))
    ));
    assert!(env.repository.find_all_links().is_empty());
}

// =============================================================================
// visit
// =============================================================================

#[test]
fn test_visit_until_limit() {
    let notifier = Arc::new(RecordingNotifier::default());
    let browser = Arc::new(RecordingBrowser::default());
    let env = setup_with(AppConfig::default(), notifier.clone(), browser.clone());
    let owner = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com/one", 1)
        .unwrap();

    let first = env.ctx.link_service.visit(&link.code).unwrap();
    assert_eq!(first.status(), VisitStatus::Success);
    assert_eq!(first.link().unwrap().visit_count, 1);
    assert_eq!(first.destination(), Some("https://example.com/one"));
    assert!(notifier.contains("info", "Redirecting to original URL..."));
    assert_eq!(*browser.opened.lock(), vec!["https://example.com/one"]);

    let second = env.ctx.link_service.visit(&link.code).unwrap();
    assert_eq!(second.status(), VisitStatus::LimitReached);
    assert_eq!(second.link().unwrap().visit_count, 1);
    assert!(notifier.contains("warning", "Visit limit reached for this link."));
    assert_eq!(browser.opened.lock().len(), 1);
    assert_eq!(
        env.repository.find_link_by_code(&link.code).unwrap().visit_count,
        1
    );
}

#[test]
fn test_visit_expired_link_deletes_it() {
    let notifier = Arc::new(RecordingNotifier::default());
    let env = setup_with(AppConfig::default(), notifier.clone(), Arc::new(NoopBrowser));
    let owner = register(&env);
    let mut link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 3)
        .unwrap();
    link.expires_at = Utc::now() - Duration::seconds(5);
    env.repository.save_link(link.clone()).unwrap();

    let outcome = env.ctx.link_service.visit(&link.code).unwrap();
    assert!(matches!(outcome, VisitOutcome::Expired(ref l) if l.code == link.code));
    assert!(notifier.contains("warning", "Link expired and removed."));

    let again = env.ctx.link_service.visit(&link.code).unwrap();
    assert_eq!(again, VisitOutcome::NotFound);
    assert!(again.link().is_none());
    assert!(notifier.contains("warning", "Short link not found."));
}

#[test]
fn test_visit_accepts_full_short_url() {
    let env = setup();
    let owner = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 5)
        .unwrap();

    let full = format!("https://clck.ru/{}?utm_source=x#frag", link.code);
    let via_url = env.ctx.link_service.visit(&full).unwrap();
    assert!(via_url.is_success());
    assert_eq!(via_url.link().unwrap().code, link.code);

    let via_code = env.ctx.link_service.visit(&link.code).unwrap();
    assert_eq!(via_code.link().unwrap().visit_count, 2);
}

#[test]
fn test_visit_blank_input_is_invalid() {
    let env = setup();
    assert!(matches!(
        env.ctx.link_service.visit("   "),
        Err(ShortlinkError::InvalidInput(_))
    ));
}

#[test]
fn test_browser_failure_is_reported_not_raised() {
    let notifier = Arc::new(RecordingNotifier::default());
    let browser = Arc::new(RecordingBrowser {
        fail: true,
        ..Default::default()
    });
    let env = setup_with(AppConfig::default(), notifier.clone(), browser);
    let owner = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 2)
        .unwrap();

    let outcome = env.ctx.link_service.visit(&link.code).unwrap();
    assert!(outcome.is_success());
    assert!(
        notifier
            .messages
            .lock()
            .iter()
            .any(|(l, m)| l == "error" && m.contains("no display"))
    );
}

#[test]
fn test_browser_disabled_by_config() {
    let mut config = AppConfig::default();
    config.links.open_browser = false;
    let browser = Arc::new(RecordingBrowser::default());
    let env = setup_with(config, Arc::new(SilentNotifier), browser.clone());
    let owner = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 2)
        .unwrap();

    assert!(env.ctx.link_service.visit(&link.code).unwrap().is_success());
    assert!(browser.opened.lock().is_empty());
}

// =============================================================================
// delete / update
// =============================================================================

#[test]
fn test_delete_ownership() {
    let env = setup();
    let owner = register(&env);
    let stranger = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 1)
        .unwrap();

    assert!(matches!(
        env.ctx.link_service.delete_short_link(stranger, &link.code),
        Err(ShortlinkError::Forbidden(_))
    ));
    assert!(env.repository.find_link_by_code(&link.code).is_some());

    assert!(env.ctx.link_service.delete_short_link(owner, &link.code).unwrap());
    assert_eq!(
        env.ctx.link_service.visit(&link.code).unwrap(),
        VisitOutcome::NotFound
    );
    assert!(!env.ctx.link_service.delete_short_link(owner, "missing").unwrap());
}

#[test]
fn test_update_limit_below_visit_count_rejected() {
    let env = setup();
    let owner = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 3)
        .unwrap();
    env.ctx.link_service.visit(&link.code).unwrap();
    env.ctx.link_service.visit(&link.code).unwrap();

    assert!(matches!(
        env.ctx
            .link_service
            .update_short_link(owner, &link.code, Some(1), false),
        Err(ShortlinkError::InvalidInput(_))
    ));
    assert!(matches!(
        env.ctx
            .link_service
            .update_short_link(owner, &link.code, Some(0), false),
        Err(ShortlinkError::InvalidInput(_))
    ));
    assert_eq!(
        env.repository.find_link_by_code(&link.code).unwrap().max_visits,
        3
    );

    let updated = env
        .ctx
        .link_service
        .update_short_link(owner, &link.code, Some(2), false)
        .unwrap();
    assert_eq!(updated.max_visits, 2);
    assert_eq!(
        env.ctx.link_service.visit(&link.code).unwrap().status(),
        VisitStatus::LimitReached
    );
}

#[test]
fn test_update_refresh_ttl_alone() {
    let env = setup();
    let owner = register(&env);
    let mut link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 3)
        .unwrap();
    link.expires_at = Utc::now() + Duration::minutes(1);
    env.repository.save_link(link.clone()).unwrap();

    let updated = env
        .ctx
        .link_service
        .update_short_link(owner, &link.code, None, true)
        .unwrap();

    assert!(updated.expires_at > link.expires_at);
    assert_eq!(updated.max_visits, 3);
}

#[test]
fn test_update_errors() {
    let env = setup();
    let owner = register(&env);
    let stranger = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 3)
        .unwrap();
    let service = &env.ctx.link_service;

    assert!(matches!(
        service.update_short_link(owner, &link.code, None, false),
        Err(ShortlinkError::InvalidInput(_))
    ));
    assert!(matches!(
        service.update_short_link(owner, "missing", Some(5), false),
        Err(ShortlinkError::NotFound(_))
    ));
    assert!(matches!(
        service.update_short_link(stranger, &link.code, Some(5), true),
        Err(ShortlinkError::Forbidden(_))
    ));
}

#[test]
fn test_update_never_resurrects_expired_link() {
    let env = setup();
    let owner = register(&env);
    let mut link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 3)
        .unwrap();
    link.expires_at = Utc::now() - Duration::seconds(1);
    env.repository.save_link(link.clone()).unwrap();

    assert!(matches!(
        env.ctx
            .link_service
            .update_short_link(owner, &link.code, None, true),
        Err(ShortlinkError::NotFound(_))
    ));
    assert!(env.repository.find_link_by_code(&link.code).is_none());
}

#[test]
fn test_update_expired_link_by_stranger_is_forbidden() {
    let env = setup();
    let owner = register(&env);
    let stranger = register(&env);
    let mut link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 3)
        .unwrap();
    link.expires_at = Utc::now() - Duration::seconds(1);
    env.repository.save_link(link.clone()).unwrap();

    assert!(matches!(
        env.ctx
            .link_service
            .update_short_link(stranger, &link.code, Some(5), false),
        Err(ShortlinkError::Forbidden(_))
    ));
    // 非所有者不能删除他人的链接
    assert_eq!(env.repository.find_link_by_code(&link.code), Some(link));
}

// =============================================================================
// listing / sweep / formatting
// =============================================================================

#[test]
fn test_list_and_remove_expired() {
    let env = setup();
    let owner = register(&env);
    let active = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com/active", 1)
        .unwrap();
    let mut stale = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com/stale", 1)
        .unwrap();
    stale.expires_at = Utc::now() - Duration::seconds(5);
    env.repository.save_link(stale.clone()).unwrap();

    assert_eq!(env.ctx.link_service.list_links(owner).len(), 2);

    let removed = env.ctx.link_service.remove_expired().unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].code, stale.code);
    assert_eq!(
        env.ctx.link_service.find_link(&active.code).unwrap(),
        Some(active)
    );
    assert_eq!(env.ctx.link_service.list_links(owner).len(), 1);
}

#[test]
fn test_full_short_url_normalizes_domain() {
    let mut config = AppConfig::default();
    config.links.domain = "https://sho.rt".to_string();
    let env = setup_with(config, Arc::new(SilentNotifier), Arc::new(NoopBrowser));

    assert_eq!(
        env.ctx.link_service.to_full_short_url("AbC1234"),
        "https://sho.rt/AbC1234"
    );
}

#[test]
fn test_state_survives_reopen() {
    let env = setup();
    let owner = register(&env);
    let link = env
        .ctx
        .link_service
        .create_short_link(owner, "https://example.com", 4)
        .unwrap();
    env.ctx.link_service.visit(&link.code).unwrap();

    let reopened = FileRepository::open(env.repository.path()).unwrap();
    assert_eq!(reopened.snapshot(), env.repository.snapshot());
    assert_eq!(reopened.find_link_by_code(&link.code).unwrap().visit_count, 1);
}
