//! Default HTTP lookup
//!
//! Issues `GET <endpoint>?q=<query>` and expects a JSON array in the body.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;

use super::LookupError;
use crate::ResultSet;

#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: Client,
    endpoint: Url,
}

impl HttpLookup {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, LookupError> {
        let endpoint = Url::parse(endpoint).map_err(|e| LookupError::NotConfigured {
            message: format!("Invalid endpoint {:?}: {}", endpoint, e),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub async fn lookup(&self, query: &str) -> Result<ResultSet, LookupError> {
        log::debug!("GET {} q={:?}", self.endpoint, query);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query)])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LookupError::Api { code, message });
        }

        let body = response.json::<Value>().await.map_err(|e| LookupError::Parse {
            message: e.to_string(),
        })?;

        parse_result_set(body)
    }
}

/// Arrays become result sets, `null` an empty one; anything else is rejected
pub(crate) fn parse_result_set(body: Value) -> Result<ResultSet, LookupError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(LookupError::Parse {
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
