//! 土壌品質ゲージ（半円メーター）

use leptos::prelude::*;
use soil_ai_common::types::{clamp_quality, gauge_rotation_degrees};
use soil_ai_common::QualityBand;

#[component]
pub fn QualityGauge(quality: f64) -> impl IntoView {
    let score = clamp_quality(quality);
    let band = QualityBand::from_score(score);
    let rotation = gauge_rotation_degrees(score);

    view! {
        <div class="quality-gauge">
            <div class="gauge-dial">
                <div class="gauge-arc" />
                <div
                    class=format!("gauge-needle band-{}", band.as_str())
                    style=format!("transform: rotate({:.1}deg)", rotation)
                />
            </div>
            <div class="gauge-value">
                <span class="gauge-score">{format!("{:.0}", score)}</span>
                <span class="gauge-max">"/100"</span>
            </div>
            <p class=format!("gauge-label band-{}", band.as_str())>{band.label()}</p>
        </div>
    }
}
