//! Line-oriented console for repeated runs without restarting the binary.
//!
//! ```text
//! > count 20
//! > run
//! [10:42:01] [1/5] 正在获取微博热搜榜单...
//! ...
//! > open
//! ```
//!
//! Each `run` is executed on its own spawned task. Progress comes back over an
//! unbounded mpsc channel and the final result over a oneshot channel, so the
//! prompt stays responsive while a run is in flight. Only one run may be in
//! flight at a time; there is no cancellation.

use crate::config::{AppConfig, ALLOWED_COUNTS};
use crate::error::BoxError;
use crate::pipeline::{ChannelObserver, PipelineOutcome, ProgressEvent, RunOptions, run_pipeline};
use crate::sources::TopicSource;
use crate::utils::open_in_browser;
use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument, warn};

type RunResult = Result<PipelineOutcome, String>;

/// One console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Count(usize),
    Run,
    Open,
    Status,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("数量必须是 5、10、20 或 30 之一，收到: {0}")]
    InvalidCount(String),

    #[error("未知命令: {0} (输入 help 查看可用命令)")]
    Unknown(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let cmd = match head.to_lowercase().as_str() {
        "count" | "n" => {
            let raw = words.next().unwrap_or_default();
            match raw.parse::<usize>() {
                Ok(n) if ALLOWED_COUNTS.contains(&n) => Command::Count(n),
                _ => return Err(CommandError::InvalidCount(raw.to_string())),
            }
        }
        "run" | "r" => Command::Run,
        "open" | "o" => Command::Open,
        "status" | "s" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

/// Topic count the console starts with; out-of-range config values fall back to 10.
pub fn initial_count(configured: usize) -> usize {
    if ALLOWED_COUNTS.contains(&configured) {
        configured
    } else {
        warn!(configured, "Configured count is not selectable in the console; using 10");
        10
    }
}

/// The report `open` should show: this session's last report, else today's file.
pub fn latest_report(last: Option<&Path>, today: &Path) -> Option<PathBuf> {
    last.filter(|p| p.is_file())
        .or_else(|| Some(today).filter(|p| p.is_file()))
        .map(Path::to_path_buf)
}

const HELP: &str = "\
可用命令:
  count <5|10|20|30>  设置分析的热搜数量
  run                 开始分析
  open                在浏览器中打开最新报告
  status              查看当前设置
  help                显示本帮助
  quit                退出";

fn log_line(message: impl std::fmt::Display) {
    println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
}

fn spawn_run<S>(
    source: &S,
    config: &AppConfig,
    top_n: usize,
    progress_tx: &mpsc::UnboundedSender<ProgressEvent>,
) -> oneshot::Receiver<RunResult>
where
    S: TopicSource + Clone + Send + Sync + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();
    let source = source.clone();
    let observer = ChannelObserver::new(progress_tx.clone());
    let now = Local::now();
    let options = RunOptions {
        top_n,
        output_path: config.report_path(now.date_naive()),
        generated_at: now.naive_local(),
    };

    tokio::spawn(async move {
        let result = run_pipeline(&source, &options, &observer)
            .await
            .map_err(|e| e.to_string());
        // the console may already have quit
        let _ = done_tx.send(result);
    });
    done_rx
}

/// The single run slot: at most one worker is in flight.
#[derive(Debug, Default)]
struct RunSlot {
    pending: Option<oneshot::Receiver<RunResult>>,
}

impl RunSlot {
    fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a run unless one is already in flight. Returns `false` if rejected.
    fn try_start(&mut self, start: impl FnOnce() -> oneshot::Receiver<RunResult>) -> bool {
        if self.is_busy() {
            return false;
        }
        self.pending = Some(start());
        true
    }

    /// Resolve when the in-flight run finishes, freeing the slot. Never resolves when idle.
    ///
    /// A worker that panicked drops its sender, which shows up as `Err(RecvError)`.
    async fn wait(&mut self) -> Result<RunResult, oneshot::error::RecvError> {
        let Some(rx) = self.pending.as_mut() else {
            return std::future::pending().await;
        };
        let done = rx.await;
        self.pending = None;
        done
    }
}

/// Console lines describing a finished run. Remembers the report path on success.
fn outcome_lines(
    done: Result<RunResult, oneshot::error::RecvError>,
    last_report: &mut Option<PathBuf>,
) -> Vec<String> {
    match done {
        Ok(Ok(PipelineOutcome::Written { path, ideas, summary })) => {
            let mut lines = vec![format!("共生成 {} 个产品创意", summary.total())];
            lines.extend(ideas.iter().map(|idea| {
                format!(
                    "  {} | {} | {} | {}分",
                    idea.topic,
                    idea.product_name,
                    idea.rating.label(),
                    idea.total_score
                )
            }));
            lines.push("输入 open 在浏览器中查看报告".to_string());
            *last_report = Some(path);
            lines
        }
        Ok(Ok(PipelineOutcome::NoData)) => vec!["未获取到热搜数据，本次未生成报告".to_string()],
        Ok(Err(msg)) => {
            error!(error = %msg, "Run failed");
            vec![format!("运行失败: {}", msg)]
        }
        Err(_) => {
            error!("Worker task ended without reporting a result");
            vec!["运行异常终止，可以重新输入 run".to_string()]
        }
    }
}

/// Run the console until `quit` or end of input.
#[instrument(level = "info", skip_all)]
pub async fn run_console<S>(source: S, config: AppConfig) -> Result<(), BoxError>
where
    S: TopicSource + Clone + Send + Sync + 'static,
{
    let mut count = initial_count(config.default_count);
    let mut last_report: Option<PathBuf> = None;
    let mut slot = RunSlot::default();
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("微博热搜产品创意分析");
    println!("{}", HELP);
    info!(count, "Interactive console started");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "Failed to read from stdin");
                        break;
                    }
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Count(n))) => {
                        count = n;
                        log_line(format!("分析数量已设置为 {}", n));
                    }
                    Ok(Some(Command::Run)) => {
                        if slot.try_start(|| spawn_run(&source, &config, count, &progress_tx)) {
                            info!(count, "Started run");
                            log_line(format!("开始分析 {} 条热搜...", count));
                        } else {
                            log_line("分析进行中，请等待当前任务完成");
                        }
                    }
                    Ok(Some(Command::Open)) => {
                        let today = config.report_path(Local::now().date_naive());
                        match latest_report(last_report.as_deref(), &today) {
                            Some(path) => match open_in_browser(&path).await {
                                Ok(()) => log_line(format!("已打开报告: {}", path.display())),
                                Err(e) => {
                                    warn!(error = %e, "Could not launch browser");
                                    log_line(format!("无法打开浏览器: {}", e));
                                }
                            },
                            None => log_line("找不到最新报告文件"),
                        }
                    }
                    Ok(Some(Command::Status)) => {
                        let state = if slot.is_busy() { "分析中" } else { "空闲" };
                        log_line(format!("数量: {} | 状态: {}", count, state));
                        if let Some(path) = &last_report {
                            log_line(format!("最新报告: {}", path.display()));
                        }
                    }
                    Ok(Some(Command::Help)) => println!("{}", HELP),
                    Ok(Some(Command::Quit)) => {
                        if slot.is_busy() {
                            warn!("Quitting with a run still in flight");
                        }
                        break;
                    }
                    Err(e) => log_line(e),
                }
            }
            Some(event) = progress_rx.recv() => log_line(event),
            done = slot.wait() => {
                // drain what the worker sent before finishing
                while let Ok(event) = progress_rx.try_recv() {
                    log_line(event);
                }
                for line in outcome_lines(done, &mut last_report) {
                    log_line(line);
                }
            }
        }
    }

    info!("Interactive console stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TopicRecord;
    use crate::sources::StaticSource;

    #[test]
    fn test_parse_command_basic() {
        assert_eq!(parse_command("run"), Ok(Some(Command::Run)));
        assert_eq!(parse_command("  OPEN "), Ok(Some(Command::Open)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("help"), Ok(Some(Command::Help)));
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_parse_command_count() {
        assert_eq!(parse_command("count 20"), Ok(Some(Command::Count(20))));
        assert_eq!(parse_command("n 5"), Ok(Some(Command::Count(5))));
        assert_eq!(
            parse_command("count 7"),
            Err(CommandError::InvalidCount("7".to_string()))
        );
        assert_eq!(
            parse_command("count"),
            Err(CommandError::InvalidCount(String::new()))
        );
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(
            parse_command("launch"),
            Err(CommandError::Unknown("launch".to_string()))
        );
    }

    #[test]
    fn test_initial_count() {
        assert_eq!(initial_count(20), 20);
        assert_eq!(initial_count(7), 10);
    }

    #[test]
    fn test_latest_report_prefers_session_report() {
        let dir = std::env::temp_dir().join(format!(
            "weibo_trend_ideas_console_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let last = dir.join("weibo_product_ideas_260104.html");
        let today = dir.join("weibo_product_ideas_260105.html");

        assert_eq!(latest_report(Some(&last), &today), None);

        std::fs::write(&today, "x").unwrap();
        assert_eq!(latest_report(Some(&last), &today), Some(today.clone()));
        assert_eq!(latest_report(None, &today), Some(today.clone()));

        std::fs::write(&last, "x").unwrap();
        assert_eq!(latest_report(Some(&last), &today), Some(last.clone()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[derive(Debug, Clone)]
    struct PanickingSource;

    impl TopicSource for PanickingSource {
        async fn fetch_topics(&self, _top_n: usize) -> Vec<TopicRecord> {
            panic!("source blew up");
        }
    }

    fn scratch_config(tag: &str) -> AppConfig {
        let dir = std::env::temp_dir().join(format!(
            "weibo_trend_ideas_slot_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        AppConfig {
            output_dir: dir,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_pending() {
        let mut slot = RunSlot::default();
        let (tx, rx) = oneshot::channel::<RunResult>();

        assert!(slot.try_start(|| rx));
        assert!(slot.is_busy());
        assert!(!slot.try_start(|| panic!("must not start a second run")));

        tx.send(Ok(PipelineOutcome::NoData)).unwrap();
        let done = slot.wait().await;
        assert!(matches!(done, Ok(Ok(PipelineOutcome::NoData))));
        assert!(!slot.is_busy());
    }

    #[tokio::test]
    async fn test_panicked_worker_frees_slot() {
        let config = scratch_config("panic");
        let (progress_tx, _progress_rx) = mpsc::unbounded_channel();
        let mut slot = RunSlot::default();

        assert!(slot.try_start(|| spawn_run(&PanickingSource, &config, 10, &progress_tx)));
        let done = slot.wait().await;
        assert!(done.is_err());
        assert!(!slot.is_busy());

        let mut last_report = None;
        let lines = outcome_lines(done, &mut last_report);
        assert_eq!(lines, vec!["运行异常终止，可以重新输入 run".to_string()]);
        assert_eq!(last_report, None);

        // the trigger works again after the failure
        let source = StaticSource::default();
        assert!(slot.try_start(|| spawn_run(&source, &config, 10, &progress_tx)));
        assert!(matches!(slot.wait().await, Ok(Ok(PipelineOutcome::NoData))));

        let _ = std::fs::remove_dir_all(&config.output_dir);
    }

    #[tokio::test]
    async fn test_finished_run_lists_ideas_and_remembers_report() {
        let config = scratch_config("written");
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let source = StaticSource::new(vec![TopicRecord::new("国考成绩查询", 500_000)]);
        let mut slot = RunSlot::default();

        assert!(slot.try_start(|| spawn_run(&source, &config, 10, &progress_tx)));
        let done = slot.wait().await;

        let mut last_report = None;
        let lines = outcome_lines(done, &mut last_report);
        assert_eq!(lines[0], "共生成 1 个产品创意");
        assert!(lines[1].contains("国考成绩查询"));
        assert!(lines[1].contains("96分"));
        assert!(last_report.as_deref().is_some_and(Path::is_file));
        assert!(progress_rx.try_recv().is_ok());

        let _ = std::fs::remove_dir_all(&config.output_dir);
    }

    #[test]
    fn test_failed_run_is_reported() {
        let mut last_report = None;
        let lines = outcome_lines(Ok(Err("permission denied".to_string())), &mut last_report);
        assert_eq!(lines, vec!["运行失败: permission denied".to_string()]);
        assert_eq!(last_report, None);
    }
}
