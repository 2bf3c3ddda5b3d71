//! TianAPI Weibo hot-search client.
//!
//! Issues a single GET to the hot-search endpoint with the API key in the query
//! string and a desktop browser user-agent. The connect and read timeout comes
//! from [`AppConfig::timeout_secs`]. There is no retry.
//!
//! # Response shapes
//!
//! The documented body is `{"code":200,"result":{"list":[...]}}`, but the
//! parser also accepts `result` being the array itself and a top-level `list`.
//! Each item carries `hotword` (or `word`) and `hotwordnum`, the latter either
//! a formatted string such as `"1,234 567"` or a plain number.

use super::TopicSource;
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::TopicRecord;
use crate::utils::parse_popularity;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    result: Option<ResultField>,
    #[serde(default)]
    list: Option<Vec<Option<RawHotItem>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultField {
    Direct(Vec<Option<RawHotItem>>),
    Wrapped {
        #[serde(default)]
        list: Option<Vec<Option<RawHotItem>>>,
    },
}

#[derive(Debug, Deserialize)]
struct RawHotItem {
    #[serde(default, alias = "word")]
    hotword: Option<String>,
    #[serde(default)]
    hotwordnum: Option<Value>,
}

impl RawHotItem {
    /// Items without a name are dropped.
    fn into_topic(self) -> Option<TopicRecord> {
        let name = self.hotword.filter(|w| !w.trim().is_empty())?;
        let popularity = match self.hotwordnum {
            Some(Value::String(s)) => parse_popularity(&s),
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            _ => 0,
        };
        Some(TopicRecord::new(name, popularity))
    }
}

impl ApiEnvelope {
    fn into_items(self) -> Vec<RawHotItem> {
        let from_result = match self.result {
            Some(ResultField::Wrapped { list }) => list.unwrap_or_default(),
            Some(ResultField::Direct(items)) => items,
            None => Vec::new(),
        };
        let items = if from_result.iter().any(Option::is_some) {
            from_result
        } else {
            self.list.unwrap_or_default()
        };
        items.into_iter().flatten().collect()
    }
}

/// Parse a raw response body into topic records, in API order.
///
/// # Errors
///
/// - [`FetchError::Decode`] if the body is not JSON of the expected shape
/// - [`FetchError::Api`] if `code` is anything other than 200
pub fn parse_hot_list(body: &str) -> Result<Vec<TopicRecord>, FetchError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;
    if envelope.code != SUCCESS_CODE {
        return Err(FetchError::Api {
            code: envelope.code,
            msg: envelope
                .msg
                .unwrap_or_else(|| "no message".to_string()),
        });
    }
    Ok(envelope
        .into_items()
        .into_iter()
        .filter_map(RawHotItem::into_topic)
        .collect())
}

/// Hot-search source backed by the TianAPI `weibohot` endpoint.
#[derive(Debug, Clone)]
pub struct TianApiSource {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl TianApiSource {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialized.
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request_url(&self) -> Result<Url, FetchError> {
        Ok(Url::parse_with_params(
            &self.endpoint,
            &[("key", self.api_key.as_str())],
        )?)
    }

    /// Fetch and parse, surfacing every failure.
    #[instrument(level = "info", skip(self))]
    pub async fn try_fetch(&self, top_n: usize) -> Result<Vec<TopicRecord>, FetchError> {
        let url = self.request_url()?;
        debug!(endpoint = %self.endpoint, "Requesting hot-search list");

        let body = self.client.get(url).send().await?.text().await?;
        let topics = parse_hot_list(&body)?;
        info!(count = topics.len(), "Received hot-search entries");

        Ok(topics.into_iter().take(top_n).collect())
    }
}

impl TopicSource for TianApiSource {
    async fn fetch_topics(&self, top_n: usize) -> Vec<TopicRecord> {
        match self.try_fetch(top_n).await {
            Ok(topics) => topics,
            Err(e) => {
                error!(error = %e, "Hot-search request failed; continuing with no topics");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documented_shape() {
        let body = r#"{
            "code": 200,
            "msg": "success",
            "result": {
                "list": [
                    {"hotword": "国考成绩查询", "hotwordnum": " 500,000", "hottag": "热"},
                    {"hotword": "携程被约谈", "hotwordnum": "1 234 567"}
                ]
            }
        }"#;

        let topics = parse_hot_list(body).unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0], TopicRecord::new("国考成绩查询", 500_000));
        assert_eq!(topics[1].popularity, 1_234_567);
    }

    #[test]
    fn test_parse_result_as_array() {
        let body = r#"{"code":200,"result":[{"hotword":"a","hotwordnum":"12"}]}"#;
        let topics = parse_hot_list(body).unwrap();
        assert_eq!(topics, vec![TopicRecord::new("a", 12)]);
    }

    #[test]
    fn test_parse_top_level_list() {
        let body = r#"{"code":200,"result":{},"list":[{"word":"b","hotwordnum":7}]}"#;
        let topics = parse_hot_list(body).unwrap();
        assert_eq!(topics, vec![TopicRecord::new("b", 7)]);
    }

    #[test]
    fn test_null_hotword_skips_only_that_item() {
        let body = r#"{"code":200,"result":{"list":[
            {"hotword":"国考成绩查询","hotwordnum":"500000"},
            {"hotword":null,"hotwordnum":"9"},
            null,
            {"hotword":"携程被约谈","hotwordnum":"3"}
        ]}}"#;
        let topics = parse_hot_list(body).unwrap();
        assert_eq!(
            topics,
            vec![
                TopicRecord::new("国考成绩查询", 500_000),
                TopicRecord::new("携程被约谈", 3),
            ]
        );

        let body = r#"{"code":200,"result":[
            {"hotword":"国考成绩查询","hotwordnum":"1"},
            {"hotword":null},
            {"word":"花海","hotwordnum":"2"}
        ]}"#;
        assert_eq!(parse_hot_list(body).unwrap().len(), 2);
    }

    #[test]
    fn test_null_result_list_falls_back_to_top_level_list() {
        let body = r#"{"code":200,"result":{"list":null},"list":[{"hotword":"a"}]}"#;
        let topics = parse_hot_list(body).unwrap();
        assert_eq!(topics, vec![TopicRecord::new("a", 0)]);
    }

    #[test]
    fn test_malformed_popularity_is_zero() {
        let body = r#"{"code":200,"result":{"list":[
            {"hotword":"x","hotwordnum":"很热"},
            {"hotword":"y","hotwordnum":-3},
            {"hotword":"z"}
        ]}}"#;
        let topics = parse_hot_list(body).unwrap();
        assert!(topics.iter().all(|t| t.popularity == 0));
    }

    #[test]
    fn test_non_200_code_is_api_error() {
        let body = r#"{"code":150,"msg":"API可用次数不足"}"#;
        match parse_hot_list(body) {
            Err(FetchError::Api { code, msg }) => {
                assert_eq!(code, 150);
                assert_eq!(msg, "API可用次数不足");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        assert!(matches!(
            parse_hot_list("<html>502</html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_request_url_carries_key() {
        let config = AppConfig {
            api_key: "k&y".to_string(),
            ..AppConfig::default()
        };
        let source = TianApiSource::new(&config).unwrap();
        let url = source.request_url().unwrap();
        assert_eq!(url.path(), "/weibohot/index");
        assert_eq!(url.query(), Some("key=k%26y"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty() {
        let config = AppConfig {
            endpoint: "http://127.0.0.1:9/weibohot/index".to_string(),
            timeout_secs: 2,
            ..AppConfig::default()
        };
        let source = TianApiSource::new(&config).unwrap();
        assert!(source.fetch_topics(10).await.is_empty());
    }
}
