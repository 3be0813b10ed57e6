//! Gemini API クライアント（reqwest）

use crate::config::Config;
use crate::error::Result;
use soil_ai_common::request::{generate_content_url, service_error_from_status};
use soil_ai_common::{Error, GeminiRequest, GeminiResponse, GenerativeBackend};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            url: generate_content_url(base_url, model),
        })
    }

    /// 設定からクライアントを作成（APIキーが無ければエラー）
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Self::new(
            api_key,
            &config.api_base_url,
            &config.model,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: &GeminiRequest) -> soil_ai_common::Result<String> {
        let response = self
            .http
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini API request failed");
                Error::Service(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Gemini API error");
            return Err(service_error_from_status(status.as_u16(), &body));
        }

        let payload: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to decode Gemini response envelope");
            Error::Service(format!("invalid response envelope: {}", e))
        })?;

        payload.into_text()
    }
}
