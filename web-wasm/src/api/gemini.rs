//! Gemini API連携（fetch）
//!
//! リクエスト・レスポンスの形は共通ライブラリが持つ。
//! ここはブラウザの fetch で送受信するだけ。

use soil_ai_common::request::{generate_content_url, service_error_from_status};
use soil_ai_common::{Error, GeminiRequest, GeminiResponse, GenerativeBackend, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ブラウザの fetch を使うバックエンド
#[derive(Debug, Clone)]
pub struct FetchBackend {
    api_key: String,
    url: String,
}

impl FetchBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: generate_content_url(
                soil_ai_common::GEMINI_API_BASE_URL,
                soil_ai_common::DEFAULT_MODEL,
            ),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// JsValue を利用者向けでないサービスエラーに変換
fn js_error(context: &str, value: JsValue) -> Error {
    let detail = value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Service(format!("{}: {}", context, detail))
}

impl GenerativeBackend for FetchBackend {
    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        let body = serde_json::to_string(request)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&self.url, &opts)
            .map_err(|e| js_error("request build failed", e))?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| js_error("header set failed", e))?;
        headers
            .set("x-goog-api-key", &self.api_key)
            .map_err(|e| js_error("header set failed", e))?;

        let window = web_sys::window()
            .ok_or_else(|| Error::Service("window is not available".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("network error", e))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|e| js_error("unexpected fetch result", e))?;

        if !resp.ok() {
            let body = match resp.text() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .ok()
                    .and_then(|v| v.as_string())
                    .unwrap_or_default(),
                Err(_) => String::new(),
            };
            return Err(service_error_from_status(resp.status(), &body));
        }

        let json = JsFuture::from(resp.json().map_err(|e| js_error("invalid body", e))?)
            .await
            .map_err(|e| js_error("invalid body", e))?;
        let response: GeminiResponse = serde_wasm_bindgen::from_value(json)
            .map_err(|e| Error::Service(format!("unexpected response shape: {}", e)))?;

        response.into_text()
    }
}
