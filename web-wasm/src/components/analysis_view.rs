//! 解析結果の表示
//!
//! 結果カードと「別の画像を解析」ボタン。

use leptos::prelude::*;
use soil_ai_common::SoilAnalysis;

use super::QualityGauge;

#[component]
pub fn AnalysisView<F>(
    analysis: SoilAnalysis,
    image_url: Option<String>,
    on_reset: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    let SoilAnalysis {
        soil_quality,
        soil_type,
        summary,
        crop_recommendations,
        rest_period,
        improvement_steps,
    } = analysis;

    let crops = crop_recommendations
        .into_iter()
        .map(|crop| view! { <li class="crop-tag">{crop}</li> })
        .collect_view();

    let steps = improvement_steps
        .into_iter()
        .map(|step| view! { <li>{step}</li> })
        .collect_view();

    view! {
        <div class="analysis-view">
            <div class="analysis-top">
                {image_url.map(|url| view! {
                    <img class="soil-preview" src=url alt="Analyzed soil sample" />
                })}
                <div class="card">
                    <h3>"🌱 Soil Quality"</h3>
                    <QualityGauge quality=soil_quality />
                </div>
            </div>

            <div class="card">
                <h3>"✨ Soil Summary"</h3>
                <p class="soil-type">"Soil Type: " <strong>{soil_type}</strong></p>
                <p>{summary}</p>
            </div>

            <div class="card">
                <h3>"🌾 Crop Recommendations"</h3>
                <ul class="crop-list">{crops}</ul>
            </div>

            <div class="card">
                <h3>"☀ Rest & Recovery"</h3>
                <p>
                    "A rest period of " <strong>{rest_period}</strong>
                    " is recommended to maintain or improve fertility."
                </p>
            </div>

            <div class="card">
                <h3>"🍃 Improvement Plan"</h3>
                <ol class="improvement-steps">{steps}</ol>
            </div>

            <button
                class="btn btn-secondary"
                on:click={
                    let on_reset = on_reset.clone();
                    move |_| on_reset(())
                }
            >
                "Analyze another image"
            </button>
        </div>
    }
}
