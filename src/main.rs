//! # Weibo Trend Ideas
//!
//! Turns the current Weibo hot-search list into a ranked set of product ideas
//! and writes them to a self-contained HTML report.
//!
//! ## Features
//!
//! - Fetches the hot-search list from the TianAPI `weibohot` endpoint, or from
//!   a saved JSON topic file for offline runs
//! - Attaches canned background context to each topic by keyword rules
//! - Scores every topic against a fixed catalog of product concepts, with a
//!   bonus for search heat
//! - Renders a single HTML file with a rating summary, a distribution chart and
//!   one card per idea
//! - Offers an interactive console for repeated runs and opening the report
//!
//! ## Usage
//!
//! ```sh
//! TIANAPI_KEY=... weibo_trend_ideas -n 20 -o ./reports
//! weibo_trend_ideas --interactive
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Pull the top N hot-search topics
//! 2. **Background**: Resolve context for each topic
//! 3. **Scoring**: Match each topic to a product concept and rate it
//! 4. **Output**: Render and write `weibo_product_ideas_YYMMDD.html`

use chrono::Local;
use clap::Parser;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod background;
mod cli;
mod config;
mod error;
mod interactive;
mod models;
mod outputs;
mod pipeline;
mod rules;
mod scorer;
mod sources;
mod utils;

use cli::Cli;
use config::AppConfig;
use error::BoxError;
use pipeline::{ConsoleObserver, PipelineOutcome, RunOptions, run_pipeline};
use sources::{StaticSource, TianApiSource, TopicSource};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), BoxError> {
    // --- Tracing init ---
    // stdout carries the progress lines, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("weibo_trend_ideas starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.count, ?args.output_dir, interactive = args.interactive, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply_to(&mut config);

    let result = match &args.topics_file {
        Some(path) => {
            let source = StaticSource::from_json_file(path).await?;
            dispatch(source, config, args.interactive).await
        }
        None => {
            if config.api_key.is_empty() {
                error!("No API key configured; set TIANAPI_KEY, --api-key or api_key in the config file");
            }
            let source = TianApiSource::new(&config)?;
            dispatch(source, config, args.interactive).await
        }
    };

    let elapsed = start_time.elapsed();
    info!(elapsed_secs = elapsed.as_secs_f64(), "weibo_trend_ideas finished");
    result
}

async fn dispatch<S>(source: S, config: AppConfig, interactive: bool) -> Result<(), BoxError>
where
    S: TopicSource + Clone + Send + Sync + 'static,
{
    if interactive {
        interactive::run_console(source, config).await
    } else {
        run_once(&source, &config).await
    }
}

/// Single batch run with progress printed to stdout.
#[instrument(level = "info", skip_all, fields(count = config.default_count))]
async fn run_once<S>(source: &S, config: &AppConfig) -> Result<(), BoxError>
where
    S: TopicSource + Sync,
{
    println!("{}", "=".repeat(60));
    println!("微博热搜产品创意分析");
    println!("{}", "=".repeat(60));

    let now = Local::now();
    let options = RunOptions {
        top_n: config.default_count,
        output_path: config.report_path(now.date_naive()),
        generated_at: now.naive_local(),
    };

    match run_pipeline(source, &options, &ConsoleObserver).await {
        Ok(PipelineOutcome::Written { path, .. }) => {
            println!();
            println!("{}", "=".repeat(60));
            println!("报告文件: {}", path.display());
            println!("{}", "=".repeat(60));
            Ok(())
        }
        Ok(PipelineOutcome::NoData) => Ok(()),
        Err(e) => {
            error!(path = %options.output_path.display(), error = %e, "Run failed");
            Err(e)
        }
    }
}
