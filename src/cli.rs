//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for shortlinks using clap's derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// shortlinks - short links with visit quotas and expiry
#[derive(Parser, Debug)]
#[command(name = "shortlinks")]
#[command(version)]
#[command(about = "Short links with visit quotas and expiry, stored in a JSON file", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive menu (default)
    Console,

    /// Register a new user and print its UUID
    Register,

    /// Create a short link
    Create {
        /// Owner UUID
        owner: String,

        /// Destination URL
        url: String,

        /// Maximum number of visits
        max_visits: u32,
    },

    /// Follow a short link (code or full short URL)
    Visit {
        link: String,
    },

    /// List the links of a user
    List {
        /// Owner UUID
        owner: String,
    },

    /// Delete a short link
    Delete {
        /// Owner UUID
        owner: String,

        /// Code or full short URL
        link: String,
    },

    /// Change the visit limit or restart the TTL of a link
    Update {
        /// Owner UUID
        owner: String,

        /// Code or full short URL
        link: String,

        /// New visit limit
        #[arg(long)]
        max_visits: Option<u32>,

        /// Restart the TTL from now
        #[arg(long)]
        refresh_ttl: bool,
    },

    /// Remove expired links once and exit
    Sweep,

    /// Generate a sample configuration file
    ConfigGen {
        /// Output path (default: stdout)
        path: Option<PathBuf>,
    },
}
