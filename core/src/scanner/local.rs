use super::{ScanOutcome, Scanner, ScannerError};
use crate::number::Number;
use async_trait::async_trait;

/// Reports what can be derived from the number itself.
#[derive(Debug, Default)]
pub struct LocalScanner;

impl LocalScanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scanner for LocalScanner {
    fn identifier(&self) -> String {
        "local".to_string()
    }

    fn should_run(&self) -> bool {
        true
    }

    async fn scan(&self, number: &Number) -> ScanOutcome {
        serde_json::to_value(number)
            .map(Some)
            .map_err(|e| ScannerError::Failed(e.to_string()))
    }
}
