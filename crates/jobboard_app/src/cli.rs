use std::path::PathBuf;
use std::time::Duration;

use anyhow::ensure;
use clap::Parser;
use jobboard_core::DEFAULT_BATCH_SIZE;
use jobboard_engine::{BatchMode, FetchSettings, DEFAULT_BASE_URL};

#[derive(Debug, Parser)]
#[command(name = "jobboard", version, about = "Browse Hacker News job postings")]
pub struct Cli {
    /// Base URL of the Hacker News API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Jobs fetched per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Fetch the jobs of a batch concurrently instead of one by one
    #[arg(long)]
    pub concurrent: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Print jobs to stdout instead of starting the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Batches to load in plain mode
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Log file path
    #[arg(long, default_value = "jobboard.log")]
    pub log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fetch: FetchSettings,
    pub mode: BatchMode,
    pub batch_size: usize,
    pub plain: bool,
    pub pages: usize,
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<AppConfig> {
        ensure!(self.batch_size >= 1, "--batch-size must be at least 1");
        ensure!(self.timeout >= 1, "--timeout must be at least 1 second");
        ensure!(self.pages >= 1, "--pages must be at least 1");
        ensure!(!self.base_url.trim().is_empty(), "--base-url must not be empty");

        let fetch = FetchSettings {
            base_url: self.base_url,
            request_timeout: Duration::from_secs(self.timeout),
            ..FetchSettings::default()
        };
        let mode = if self.concurrent {
            BatchMode::Concurrent
        } else {
            BatchMode::Sequential
        };

        Ok(AppConfig {
            fetch,
            mode,
            batch_size: self.batch_size,
            plain: self.plain,
            pages: self.pages,
            log_file: self.log_file,
            verbose: self.verbose,
        })
    }
}
