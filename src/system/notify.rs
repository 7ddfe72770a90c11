//! Notification sink
//!
//! The core reports outcomes through [`Notifier`] and never inspects a result,
//! so every implementation is fire-and-forget.

use colored::Colorize;
use tracing::{error, info, warn};

pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        info!(target: "shortlinks::notify", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(target: "shortlinks::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "shortlinks::notify", "{}", message);
    }
}

/// Coloured terminal output for the interactive front-end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{} {}", "[INFO]".bold().blue(), message);
    }

    fn warning(&self, message: &str) {
        println!("{} {}", "[WARN]".bold().yellow(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "[ERROR]".bold().red(), message);
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
