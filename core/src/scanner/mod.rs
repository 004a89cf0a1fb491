// Scanner module
// 扫描器的核心接口和类型

pub mod googlesearch;
pub mod local;
pub mod manager;
pub mod numverify;
pub mod report;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ScanConfig;
use crate::number::Number;

/// Failure reported by a single scanner.
///
/// The dispatcher never inspects it; it is stored as-is under the scanner's
/// identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScannerError {
    #[error("{0}")]
    Failed(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Scanner panicked: {0}")]
    Panicked(String),
}

impl From<reqwest::Error> for ScannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScannerError::InvalidResponse(err.to_string())
        } else {
            ScannerError::Http(err.to_string())
        }
    }
}

/// `Ok(None)` and `Ok(Some(Value::Null))` both mean "nothing found".
pub type ScanOutcome = Result<Option<Value>, ScannerError>;

/// 扫描器 trait - 所有扫描器都需要实现此接口
///
/// `S` is the subject handed to every scanner; the dispatcher never looks
/// inside it.
#[async_trait]
pub trait Scanner<S = Number>: Send + Sync
where
    S: Send + Sync + 'static,
{
    /// Stable identifier, unique among registered scanners
    fn identifier(&self) -> String;

    /// Whether the scanner has what it needs to run at all (API keys etc).
    /// Checked once, when the scanner is registered.
    fn should_run(&self) -> bool;

    async fn scan(&self, subject: &S) -> ScanOutcome;
}

/// Built-in scanners, in the order they are registered.
pub fn default_scanners(config: &ScanConfig) -> Vec<Arc<dyn Scanner>> {
    vec![
        Arc::new(local::LocalScanner::new()),
        Arc::new(numverify::NumverifyScanner::new(config.numverify.clone())),
        Arc::new(googlesearch::GoogleSearchScanner::new()),
    ]
}

pub(crate) fn is_empty_value(value: &Option<Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}
