//! 解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - SoilAnalysis: モデルが返す土壌解析結果
//! - EncodedImage: 送信用にBase64化した画像
//! - QualityBand: 品質スコアの表示区分（ゲージ表示用）

use serde::{Deserialize, Serialize};

/// 品質スコアの下限
pub const QUALITY_MIN: f64 = 0.0;
/// 品質スコアの上限
pub const QUALITY_MAX: f64 = 100.0;

/// 土壌解析結果
///
/// 6フィールドすべて必須。欠けている場合は部分結果ではなく
/// 契約違反として扱う（`parser::parse_soil_analysis` 参照）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilAnalysis {
    pub soil_quality: f64,              // 0-100
    pub soil_type: String,              // Sandy, Clay, Loam...
    pub summary: String,
    pub crop_recommendations: Vec<String>,
    pub rest_period: String,            // "2-3 months" など
    pub improvement_steps: Vec<String>, // 実施順
}

impl SoilAnalysis {
    /// 表示用に[0,100]へ丸めたスコア
    pub fn clamped_quality(&self) -> f64 {
        clamp_quality(self.soil_quality)
    }

    pub fn quality_band(&self) -> QualityBand {
        QualityBand::from_score(self.soil_quality)
    }
}

/// 送信用エンコード済み画像
///
/// `payload` は "data:...;base64," 接頭辞を含まない純粋なBase64文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub payload: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(payload: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            mime_type: mime_type.into(),
        }
    }

    /// プレビュー表示用のData URLを組み立てる
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

/// 品質スコアの区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    Poor,
    Average,
    Good,
}

impl QualityBand {
    /// スコアから区分を判定（40未満: Poor, 70未満: Average, それ以上: Good）
    pub fn from_score(score: f64) -> Self {
        let score = clamp_quality(score);
        if score < 40.0 {
            QualityBand::Poor
        } else if score < 70.0 {
            QualityBand::Average
        } else {
            QualityBand::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityBand::Poor => "Poor",
            QualityBand::Average => "Average",
            QualityBand::Good => "Good",
        }
    }

    /// CSSクラス名（Web UI用）
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBand::Poor => "poor",
            QualityBand::Average => "average",
            QualityBand::Good => "good",
        }
    }
}

impl std::fmt::Display for QualityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// スコアを[0,100]に丸める。NaNは0扱い
pub fn clamp_quality(score: f64) -> f64 {
    if score.is_nan() {
        return QUALITY_MIN;
    }
    score.clamp(QUALITY_MIN, QUALITY_MAX)
}

/// 半円ゲージの針の角度（-90°〜+90°）
pub fn gauge_rotation_degrees(score: f64) -> f64 {
    clamp_quality(score) / QUALITY_MAX * 180.0 - 90.0
}
