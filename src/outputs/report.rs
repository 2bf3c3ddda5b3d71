//! Report file naming and persistence.
//!
//! Reports are named after the day they were produced:
//! ```text
//! output_dir/
//! └── weibo_product_ideas_260105.html
//! ```
//!
//! A second run on the same day overwrites the earlier file.

use crate::error::BoxError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// `<dir>/<prefix>_<YYMMDD>.html`
pub fn report_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_{}.html", prefix, date.format("%y%m%d")))
}

/// Write the rendered document as UTF-8, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(path: &Path, html: &str) -> Result<(), BoxError> {
    fs::write(path, html.as_bytes()).await?;
    info!(bytes = html.len(), "Wrote HTML report");
    Ok(())
}
