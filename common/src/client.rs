//! 解析クライアント / 追加質問クライアント
//!
//! どちらも状態を持たない単発のリクエスト/レスポンス。
//! キャッシュもリトライもしない（失敗は呼び出し側へそのまま返す）。

use crate::backend::GenerativeBackend;
use crate::error::Result;
use crate::parser::parse_soil_analysis;
use crate::request::{build_analysis_request, build_follow_up_request};
use crate::types::{EncodedImage, SoilAnalysis};

/// 土壌画像を解析
pub async fn analyze<B: GenerativeBackend>(backend: &B, image: &EncodedImage) -> Result<SoilAnalysis> {
    let request = build_analysis_request(image);
    tracing::debug!(
        mime_type = %image.mime_type,
        payload_len = image.payload.len(),
        "sending analysis request"
    );

    let text = backend.generate(&request).await?;

    parse_soil_analysis(&text).inspect_err(|e| {
        tracing::error!(error = %e, raw = %text, "failed to parse analysis response");
    })
}

/// 解析結果について追加質問
///
/// 質問が空でないことは呼び出し側（Session）が保証する。
/// 応答テキストは加工せずそのまま返す。
pub async fn ask<B: GenerativeBackend>(
    backend: &B,
    image: &EncodedImage,
    analysis: &SoilAnalysis,
    question: &str,
) -> Result<String> {
    let request = build_follow_up_request(image, analysis, question)?;
    tracing::debug!(question_len = question.len(), "sending follow-up request");

    backend.generate(&request).await
}
