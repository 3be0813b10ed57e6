//! 解析結果の端末表示

use soil_ai_common::types::clamp_quality;
use soil_ai_common::{QualityBand, SoilAnalysis};

const GAUGE_WIDTH: usize = 30;

/// 品質ゲージ（例: `[##########----------] 50/100 Average`）
pub fn render_gauge(score: f64) -> String {
    let clamped = clamp_quality(score);
    let filled = ((clamped / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:.0}/100 {}",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        clamped,
        QualityBand::from_score(score)
    )
}

/// 解析結果をカード形式の文字列にする
pub fn render_analysis(analysis: &SoilAnalysis) -> String {
    let mut out = String::new();

    out.push_str("🌱 Soil Quality\n");
    out.push_str(&format!("  {}\n", render_gauge(analysis.soil_quality)));

    out.push_str("\n✨ Soil Summary\n");
    out.push_str(&format!("  Soil Type: {}\n", analysis.soil_type));
    out.push_str(&format!("  {}\n", analysis.summary));

    out.push_str("\n🌾 Crop Recommendations\n");
    if analysis.crop_recommendations.is_empty() {
        out.push_str("  (none)\n");
    }
    for crop in &analysis.crop_recommendations {
        out.push_str(&format!("  • {}\n", crop));
    }

    out.push_str("\n☀ Rest & Recovery\n");
    out.push_str(&format!(
        "  A rest period of {} is recommended to maintain or improve fertility.\n",
        analysis.rest_period
    ));

    out.push_str("\n🍃 Improvement Plan\n");
    if analysis.improvement_steps.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, step) in analysis.improvement_steps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }

    out
}
