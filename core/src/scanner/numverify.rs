use super::{ScanOutcome, Scanner, ScannerError};
use crate::config::NumverifyConfig;
use crate::number::Number;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Validation result as returned by the numverify API.
///
/// `valid` and `number` are always present in a real answer; the rest may be
/// missing or null for invalid numbers.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NumverifyResponse {
    pub valid: bool,
    pub number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub local_format: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub international_format: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country_prefix: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub carrier: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_type: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Queries the apilayer number verification API. Needs an API key.
pub struct NumverifyScanner {
    config: NumverifyConfig,
    client: reqwest::Client,
}

impl NumverifyScanner {
    pub fn new(config: NumverifyConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

#[async_trait]
impl Scanner for NumverifyScanner {
    fn identifier(&self) -> String {
        "numverify".to_string()
    }

    fn should_run(&self) -> bool {
        self.api_key().is_some()
    }

    async fn scan(&self, number: &Number) -> ScanOutcome {
        let api_key = self
            .api_key()
            .ok_or_else(|| ScannerError::Failed("numverify API key is not set".into()))?;

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("number", number.international.as_str())])
            .header("apikey", api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed = parse_response(status, &body)?;
        serde_json::to_value(parsed)
            .map(Some)
            .map_err(|e| ScannerError::Failed(e.to_string()))
    }
}

fn parse_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<NumverifyResponse, ScannerError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| status.to_string());
        return Err(ScannerError::Http(message));
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ScannerError::InvalidResponse(e.to_string()))?;

    // apilayer reports some failures (bad key, quota) with a 200 status
    if let Some(error) = value.get("error") {
        let message = error
            .get("info")
            .or_else(|| error.get("type"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ScannerError::Http(message));
    }

    serde_json::from_value(value).map_err(|e| ScannerError::InvalidResponse(e.to_string()))
}
