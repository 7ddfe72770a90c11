//! System-level modules
//!
//! - logging initialization
//! - notification sink used to report outcomes to the operator
//! - browser opener for visited destinations

pub mod browser;
pub mod logging;
pub mod notify;

pub use browser::{BrowserOpener, NoopBrowser, SystemBrowser};
pub use notify::{ConsoleNotifier, LogNotifier, Notifier, SilentNotifier};
