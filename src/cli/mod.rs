//! CLI module - Command-line interface for livemovies
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// livemovies - movie catalog web service
#[derive(Parser)]
#[command(name = "livemovies")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web API (default)
    #[command(alias = "web")]
    Serve,

    /// Bring genre/cast snapshots in line with the join tables
    Reconcile,

    /// Import the legacy movie file into an empty catalog
    Seed {
        /// Legacy data file; defaults to the configured paths
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Create a login
    CreateUser {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// List movies in the catalog
    #[command(alias = "ls")]
    List,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
