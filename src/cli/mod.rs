//! Command-line interface for Kuroneko.

mod commands;

use clap::{Parser, Subcommand};

/// Kuroneko - catalog and playback-mirror engine for a streaming site
#[derive(Parser)]
#[command(name = "kuroneko")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API and wait for Ctrl+C
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    Init,

    /// List catalog titles
    #[command(alias = "ls")]
    Titles,

    /// Show a title with its episodes
    Show {
        /// Title ID
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        id: i32,
    },

    /// Episodes flagged for alert or released today
    Today,

    /// Clear the alert flag on an episode number of a title
    ClearAlert {
        /// Title ID
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        id: i32,
        /// Episode number (all seasons)
        number: i32,
    },

    /// Recompute a title's display mirror entry from the catalog
    RebuildDisplay {
        /// Title ID
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        id: i32,
    },

    /// Remove every display mirror entry
    ClearDisplay,

    /// Manage API users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user and print its API key
    Add {
        /// Unique username
        username: String,
        /// Grant catalog write access
        #[arg(long)]
        admin: bool,
    },
    /// List users
    #[command(alias = "ls")]
    List,
}

pub use commands::*;
