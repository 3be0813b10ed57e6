//! Gemini API リクエスト/レスポンス
//!
//! generateContent のワイヤ形式と、解析・追加質問用のリクエスト組み立て。
//! 送信処理そのものは `backend::GenerativeBackend` の実装側（reqwest / fetch）が持つ。

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prompts::{build_follow_up_prompt, ANALYSIS_PROMPT};
use crate::schema::soil_analysis_schema;
use crate::types::{EncodedImage, SoilAnalysis};

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// generateContent エンドポイントURL（キーはヘッダで渡す）
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{}/models/{}:generateContent", base_url.trim_end_matches('/'), model)
}

/// Gemini APIリクエスト
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn image(image: &EncodedImage) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: image.payload.clone(),
            },
        }
    }
}

/// 解析リクエスト（画像 + 固定指示 + 応答スキーマ制約）
pub fn build_analysis_request(image: &EncodedImage) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::image(image), Part::text(ANALYSIS_PROMPT)],
        }],
        generation_config: Some(GenerationConfig {
            temperature: None,
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(soil_analysis_schema()),
        }),
    }
}

/// 追加質問リクエスト（画像 + 前回結果 + 質問、応答は自由テキスト）
pub fn build_follow_up_request(
    image: &EncodedImage,
    analysis: &SoilAnalysis,
    question: &str,
) -> Result<GeminiRequest> {
    let prompt = build_follow_up_prompt(analysis, question)?;
    Ok(GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::image(image), Part::text(prompt)],
        }],
        generation_config: None,
    })
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストを連結して返す
    ///
    /// 候補が無い（ブロックされた等）場合はサービスエラー。
    /// テキストが空でもそのまま返し、構造の判定は呼び出し側に任せる。
    pub fn into_text(self) -> Result<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(Error::Service(format!("Empty response: {}", reason)));
        };

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate.finish_reason.as_deref() {
                if reason != "STOP" {
                    return Err(Error::Service(format!("Generation stopped: {}", reason)));
                }
            }
        }

        Ok(text)
    }
}

/// APIエラー応答 `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// HTTPエラーをサービスエラーに変換
pub fn service_error_from_status(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => Error::Service(format!(
            "API error {} {}: {}",
            status, envelope.error.status, envelope.error.message
        )),
        Ok(envelope) => Error::Service(format!("API error {}: {}", status, envelope.error.message)),
        Err(_) => Error::Service(format!("API error: {}", status)),
    }
}
