//! Opening destinations in the host browser

use std::process::{Command, Stdio};

use anyhow::{Context, bail};
use tracing::debug;

/// Best-effort opener for visited destinations.
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Hands the URL to the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(url);
            cmd
        }
        #[cfg(not(any(target_os = "macos", windows)))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        if parsed.host_str().is_none() {
            bail!("URL has no host: {}", url);
        }

        debug!("Opening {} in the system browser", url);
        let mut child = Self::command(parsed.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Unable to launch the system browser")?;

        // 回收子进程，避免僵尸进程
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Never opens anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBrowser;

impl BrowserOpener for NoopBrowser {
    fn open(&self, _url: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
