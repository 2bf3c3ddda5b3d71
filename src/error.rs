//! Error types for the fetch and configuration stages.
//!
//! Everything after the fetch is a total function, so these are the only
//! typed failures in the pipeline. Output I/O errors are propagated as
//! [`BoxError`] straight to `main`.

use thiserror::Error;

/// Boxed error for the output stage; `Send + Sync` so runs can move between tasks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while talking to the hot-search API.
///
/// The topic source never hands this to the driver; it is logged and the
/// run degrades to an empty topic list.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API returned code {code}: {msg}")]
    Api { code: i64, msg: String },
}

/// Failure while loading a YAML config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
