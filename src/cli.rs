//! Command-line interface definitions.
//!
//! Every flag is optional: running the binary bare fetches the top 10 topics
//! and writes today's report into the working directory. Flags override the
//! values from `--config`, which in turn override the built-in defaults.

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Default run: top 10 topics, report in the current directory
/// weibo_trend_ideas
///
/// # Top 20 topics into ./reports, key from the environment
/// TIANAPI_KEY=... weibo_trend_ideas -n 20 -o ./reports
///
/// # Offline run from a saved topic list
/// weibo_trend_ideas --topics-file topics.json
///
/// # Interactive console
/// weibo_trend_ideas --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of hot-search topics to analyze
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Directory the HTML report is written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// TianAPI key for the hot-search endpoint
    #[arg(long, env = "TIANAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Read topics from a JSON file (`[{"name": ..., "popularity": ...}]`) instead of the API
    #[arg(long)]
    pub topics_file: Option<PathBuf>,

    /// Start the interactive console instead of a single run
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Overlay the flags that were given onto a loaded config.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(count) = self.count {
            config.default_count = count;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(key) = &self.api_key {
            config.api_key = key.clone();
        }
    }
}
