use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{LinkService, UserService};
use crate::storage::{ShortLinkRepository, StorageFactory};
use crate::system::{BrowserOpener, Notifier};

/// Everything a front-end needs, built once at startup.
pub struct AppContext {
    pub repository: Arc<dyn ShortLinkRepository>,
    pub link_service: Arc<LinkService>,
    pub user_service: Arc<UserService>,
}

impl AppContext {
    /// Open the store and construct the services.
    ///
    /// Fails with `StorageFailure` if the storage file cannot be loaded or
    /// created; the process must not start in that case.
    pub fn build(
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
        browser: Arc<dyn BrowserOpener>,
    ) -> Result<Self> {
        let start_time = Instant::now();
        debug!("Starting pre-startup processing...");

        let storage_path = config.storage.resolved_path();
        let repository = StorageFactory::create(&storage_path)?;
        info!(
            "Using storage backend: {} ({})",
            repository.backend_name(),
            storage_path.display()
        );

        Ok(Self::with_repository(config, repository, notifier, browser, start_time))
    }

    /// Wire services around an already opened repository.
    pub fn from_repository(
        config: &AppConfig,
        repository: Arc<dyn ShortLinkRepository>,
        notifier: Arc<dyn Notifier>,
        browser: Arc<dyn BrowserOpener>,
    ) -> Self {
        Self::with_repository(config, repository, notifier, browser, Instant::now())
    }

    fn with_repository(
        config: &AppConfig,
        repository: Arc<dyn ShortLinkRepository>,
        notifier: Arc<dyn Notifier>,
        browser: Arc<dyn BrowserOpener>,
        start_time: Instant,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            &config.links,
            Arc::clone(&repository),
            notifier,
            browser,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));

        info!(
            "Startup completed in {} ms (short link domain: {})",
            start_time.elapsed().as_millis(),
            link_service.domain()
        );

        Self {
            repository,
            link_service,
            user_service,
        }
    }
}
