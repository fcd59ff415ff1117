use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::source::{FetchError, HookSource};

/// GETs the telemetry document from an HTTP endpoint.
pub struct HttpHookSource {
    http: Client,
    endpoint: String,
}

impl HttpHookSource {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.trim().to_string(),
        })
    }
}

#[async_trait]
impl HookSource for HttpHookSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let resp = self.http.get(&self.endpoint).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(resp.json::<Value>().await?)
    }

    fn describe(&self) -> String {
        format!("GET {}", self.endpoint)
    }
}
