//! CLI interface module
//!
//! One-shot commands that run a single service operation and exit.

pub mod commands;

use std::fmt;

use crate::cli::Commands;
use crate::errors::ShortlinkError;
use crate::runtime::lifetime::startup::AppContext;
use crate::system::Notifier;

#[derive(Debug)]
pub enum CliError {
    Service(ShortlinkError),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Service(err) => err.format_simple(),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortlinkError> for CliError {
    fn from(err: ShortlinkError) -> Self {
        CliError::Service(err)
    }
}

/// Dispatch a one-shot command.
///
/// `Console` and `ConfigGen` are handled by the binary before a context exists.
pub fn run_command(ctx: &AppContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Register => commands::register(ctx),
        Commands::Create {
            owner,
            url,
            max_visits,
        } => commands::create_link(ctx, &owner, &url, max_visits),
        Commands::Visit { link } => commands::visit_link(ctx, &link),
        Commands::List { owner } => commands::list_links(ctx, &owner),
        Commands::Delete { owner, link } => commands::delete_link(ctx, &owner, &link),
        Commands::Update {
            owner,
            link,
            max_visits,
            refresh_ttl,
        } => commands::update_link(ctx, &owner, &link, max_visits, refresh_ttl),
        Commands::Sweep => commands::sweep(ctx),
        Commands::Console | Commands::ConfigGen { .. } => Err(CliError::CommandError(
            "command is not a one-shot command".to_string(),
        )),
    }
}

/// Run a one-shot command and report a failure through `notifier`.
///
/// Returns whether the command succeeded.
pub fn execute(ctx: &AppContext, command: Commands, notifier: &dyn Notifier) -> bool {
    match run_command(ctx, command) {
        Ok(()) => true,
        Err(e) => {
            notifier.error(&e.to_string());
            false
        }
    }
}
