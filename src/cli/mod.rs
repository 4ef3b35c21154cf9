//! CLI module for the user cache API
//!
//! - `serve`: run the HTTP server
//! - `cache-stats`: print the cache stats report for the configured backend

pub mod serve;
pub mod stats;

use clap::{Parser, Subcommand};

/// User resource API with cache-aside read acceleration
#[derive(Parser)]
#[command(name = "user-cache-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Print which user keys are cached, as JSON
    CacheStats,
}
