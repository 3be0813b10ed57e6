//! 通信中インジケーター

use leptos::prelude::*;

#[component]
pub fn Loader(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="loader-container">
            <div class="spinner" />
            <p class="loader-text">{message}</p>
        </div>
    }
}
