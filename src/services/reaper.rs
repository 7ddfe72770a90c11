//! 过期链接清理任务
//!
//! A dedicated thread sweeps expired links on a fixed period. The handle is a
//! guard: stopping (or dropping) it signals the thread and joins it, so an
//! in-flight sweep always finishes its persist and no further sweep starts.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, select};
use tracing::{debug, error, info};

use super::LinkService;
use crate::config::MIN_CLEANUP_INTERVAL_SECS;
use crate::system::Notifier;

const THREAD_NAME: &str = "short-link-reaper";

pub struct Reaper {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Reaper {
    /// Start the background sweep. The period is floored to 5 seconds; the
    /// first sweep runs one period after start.
    pub fn spawn(
        service: Arc<LinkService>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let interval = interval.max(Duration::from_secs(MIN_CLEANUP_INTERVAL_SECS));
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let ticker = crossbeam_channel::tick(interval);
                loop {
                    select! {
                        // 收到停止信号或发送端被丢弃
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            Self::sweep_once(&service, notifier.as_ref());
                        }
                    }
                }
                debug!("Reaper thread stopped");
            })?;

        info!(
            "Expired link cleanup started (interval: {} seconds)",
            interval.as_secs()
        );

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            interval,
        })
    }

    /// Run a single sweep and report the result. Never fails: errors and
    /// panics are reported through `notifier` and count as zero removals.
    pub fn sweep_once(service: &LinkService, notifier: &dyn Notifier) -> usize {
        match panic::catch_unwind(AssertUnwindSafe(|| service.remove_expired())) {
            Ok(Ok(removed)) => {
                if removed.is_empty() {
                    debug!("Cleanup sweep found no expired links");
                } else {
                    notifier.info(&format!("Removed expired links: {}", removed.len()));
                }
                removed.len()
            }
            Ok(Err(e)) => {
                error!("Cleanup sweep failed: {}", e);
                notifier.error(&format!("Background cleanup failed: {}", e));
                0
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Cleanup sweep panicked: {}", message);
                notifier.error(&format!("Background cleanup failed: {}", message));
                0
            }
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel future sweeps and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Reaper thread terminated abnormally");
            } else {
                info!("Expired link cleanup stopped");
            }
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
