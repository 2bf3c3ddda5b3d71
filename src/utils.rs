//! Utility functions for number parsing, string handling and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Popularity parsing for the loosely formatted `hotwordnum` field
//! - Character-safe truncation and thousands grouping for display
//! - HTML escaping of topic-derived text
//! - Output directory validation and launching the system browser

use crate::error::BoxError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument, warn};

static NUMERAL_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("separator pattern is valid"));

/// Parse a popularity numeral such as `"1,234 567"`.
///
/// Commas and whitespace are removed before parsing. Anything that still is not
/// a non-negative integer (empty, signed, decimal, overflowing) becomes `0`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_popularity("1,234,567"), 1234567);
/// assert_eq!(parse_popularity("n/a"), 0);
/// ```
pub fn parse_popularity(raw: &str) -> u64 {
    let cleaned = NUMERAL_SEPARATORS.replace_all(raw, "");
    cleaned.parse::<u64>().unwrap_or(0)
}

/// Keep at most `max` characters, never splitting a UTF-8 sequence.
pub fn truncate_chars(s: &str, max: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max) {
        Some((idx, _)) => Cow::Owned(s[..idx].to_string()),
        None => Cow::Borrowed(s),
    }
}

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`).
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut groups = Vec::new();
    if head > 0 {
        groups.push(digits[..head].to_string());
    }
    for chunk in &digits[head..].chars().chunks(3) {
        groups.push(chunk.collect::<String>());
    }
    groups.join(",")
}

/// Escape text for safe embedding in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), BoxError> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Open a file with the platform's default handler (the browser for `.html`).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn open_in_browser(path: &Path) -> std::io::Result<()> {
    let target = fs::canonicalize(path).await?;

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.arg("/C").arg("start").arg("");
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    let status = cmd
        .arg(&target)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await?;

    if !status.success() {
        warn!(code = ?status.code(), "Browser launcher exited unsuccessfully");
        return Err(std::io::Error::other(format!(
            "launcher exited with {status}"
        )));
    }
    Ok(())
}
