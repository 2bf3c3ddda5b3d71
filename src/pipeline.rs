//! The end-to-end run: fetch, background lookup, scoring, rendering, writing.
//!
//! Stages run strictly in sequence. Progress is pushed to a [`ProgressObserver`]
//! so the same run can print to the console or feed the interactive front end.
//! An empty topic list stops the run before anything is rendered; that is a
//! reported outcome ([`PipelineOutcome::NoData`]), not an error.

use crate::background;
use crate::error::BoxError;
use crate::models::{IdeaRecord, Rating, RatingSummary};
use crate::outputs::{html, report};
use crate::scorer;
use crate::sources::TopicSource;
use crate::utils::{ensure_writable_dir, truncate_chars};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, warn};

const TOTAL_STAGES: u8 = 5;
/// Topic names are shortened to this many characters in progress lines.
const DISPLAY_NAME_CHARS: usize = 30;

/// Parameters of one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub top_n: usize,
    /// Where the report goes; computed once by the caller.
    pub output_path: PathBuf,
    /// Timestamp embedded in the report header.
    pub generated_at: NaiveDateTime,
}

/// Human-facing progress of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Stage { step: u8, message: &'static str },
    Fetched { count: usize },
    NoData,
    Topic { index: usize, total: usize, action: &'static str, name: String },
    IdeaReady { index: usize, topic: String, product_name: String, rating: Rating, total_score: u32 },
    ReportWritten { path: PathBuf },
    Finished { total: usize, summary: RatingSummary },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Stage { step, message } => {
                write!(f, "[{}/{}] {}", step, TOTAL_STAGES, message)
            }
            ProgressEvent::Fetched { count } => write!(f, "成功获取 {} 条热搜数据", count),
            ProgressEvent::NoData => write!(f, "获取热搜数据失败，请检查网络连接或API配置"),
            ProgressEvent::Topic { index, total, action, name } => {
                write!(f, "  [{:02}/{}] {}: {}...", index, total, action, name)
            }
            ProgressEvent::IdeaReady { index, topic, product_name, rating, total_score } => write!(
                f,
                "  #{} {} -> {} ({} · {}分)",
                index,
                topic,
                product_name,
                rating.label(),
                total_score
            ),
            ProgressEvent::ReportWritten { path } => {
                write!(f, "报告已生成: {}", path.display())
            }
            ProgressEvent::Finished { total, summary } => write!(
                f,
                "热搜总数: {} | 优秀创意: {} (>80分) | 良好创意: {} (60-80分) | 普通创意: {} (<60分)",
                total, summary.excellent, summary.good, summary.normal
            ),
        }
    }
}

/// Receives progress events as the run advances.
pub trait ProgressObserver: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Prints every event on its own line to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ProgressObserver for ConsoleObserver {
    fn report(&self, event: ProgressEvent) {
        if matches!(event, ProgressEvent::Stage { .. }) {
            println!();
        }
        println!("{}", event);
    }
}

/// Forwards events over a channel, e.g. to the interactive front end.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressObserver for ChannelObserver {
    fn report(&self, event: ProgressEvent) {
        // a closed receiver only means nobody is watching any more
        let _ = self.tx.send(event);
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The source returned nothing; no report was written.
    NoData,
    Written {
        path: PathBuf,
        ideas: Vec<IdeaRecord>,
        summary: RatingSummary,
    },
}

fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Run the whole pipeline once.
///
/// # Errors
///
/// Only local I/O fails the run: an unwritable output directory (checked
/// before the fetch) or a failed report write.
#[instrument(level = "info", skip_all, fields(top_n = options.top_n, path = %options.output_path.display()))]
pub async fn run_pipeline<S, O>(
    source: &S,
    options: &RunOptions,
    observer: &O,
) -> Result<PipelineOutcome, BoxError>
where
    S: TopicSource + Sync,
    O: ProgressObserver + ?Sized,
{
    ensure_writable_dir(output_dir(&options.output_path)).await?;

    observer.report(ProgressEvent::Stage { step: 1, message: "正在获取微博热搜榜单..." });
    let topics = source.fetch_topics(options.top_n).await;
    if topics.is_empty() {
        warn!("Topic source returned no data; stopping before render");
        observer.report(ProgressEvent::NoData);
        return Ok(PipelineOutcome::NoData);
    }
    let total = topics.len();
    info!(count = total, "Fetched topics");
    observer.report(ProgressEvent::Fetched { count: total });

    observer.report(ProgressEvent::Stage { step: 2, message: "正在搜索热点背景信息..." });
    let backgrounds = topics
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            observer.report(ProgressEvent::Topic {
                index: i + 1,
                total,
                action: "搜索",
                name: truncate_chars(&topic.name, DISPLAY_NAME_CHARS).into_owned(),
            });
            background::resolve(&topic.name)
        })
        .collect::<Vec<_>>();

    observer.report(ProgressEvent::Stage { step: 3, message: "正在分析产品创意..." });
    let ideas = topics
        .iter()
        .zip(&backgrounds)
        .enumerate()
        .map(|(i, (topic, bg))| {
            let name = truncate_chars(&topic.name, DISPLAY_NAME_CHARS).into_owned();
            observer.report(ProgressEvent::Topic {
                index: i + 1,
                total,
                action: "分析",
                name: name.clone(),
            });
            let idea = scorer::score(topic, bg);
            observer.report(ProgressEvent::IdeaReady {
                index: i + 1,
                topic: name,
                product_name: idea.product_name.clone(),
                rating: idea.rating,
                total_score: idea.total_score,
            });
            idea
        })
        .collect::<Vec<_>>();

    observer.report(ProgressEvent::Stage { step: 4, message: "正在生成HTML报告..." });
    let document = html::render_report(&ideas, options.generated_at);
    report::write_report(&options.output_path, &document).await?;
    observer.report(ProgressEvent::ReportWritten { path: options.output_path.clone() });

    let summary = RatingSummary::from_ideas(&ideas);
    observer.report(ProgressEvent::Stage { step: 5, message: "分析完成!" });
    observer.report(ProgressEvent::Finished { total, summary });
    info!(
        excellent = summary.excellent,
        good = summary.good,
        normal = summary.normal,
        "Pipeline completed"
    );

    Ok(PipelineOutcome::Written {
        path: options.output_path.clone(),
        ideas,
        summary,
    })
}
