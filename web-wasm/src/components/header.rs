//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Soil AI"</h1>
            <p class="subtitle">"Upload a photo of your soil to get an instant analysis"</p>
        </header>
    }
}
