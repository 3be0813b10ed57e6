//! 追加質問パネル

use leptos::prelude::*;
use soil_ai_common::Session;

use super::Loader;

#[component]
pub fn FollowUpPanel<F>(session: RwSignal<Session>, on_ask: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    let is_asking = move || session.with(|s| s.state().is_asking);
    let can_ask = move || session.with(|s| s.can_ask());

    view! {
        <div class="card follow-up">
            <h3>"💬 Ask a follow-up question"</h3>
            <textarea
                class="follow-up-input"
                rows="3"
                placeholder="e.g. How often should I water wheat in this soil?"
                prop:value=move || session.with(|s| s.state().follow_up_question.clone())
                prop:disabled=is_asking
                on:input=move |ev| {
                    let question = event_target_value(&ev);
                    session.update(|s| s.set_follow_up_question(question));
                }
            />
            <button
                class="btn btn-primary"
                disabled=move || !can_ask()
                on:click={
                    let on_ask = on_ask.clone();
                    move |_| on_ask(())
                }
            >
                "Ask"
            </button>

            <Show when=is_asking>
                <Loader message="Thinking..." />
            </Show>

            {move || session.with(|s| s.follow_up_answer().map(str::to_string)).map(|answer| view! {
                <div class="follow-up-answer">{answer}</div>
            })}

            {move || session.with(|s| s.follow_up_error().map(str::to_string)).map(|message| view! {
                <p class="error-message">{message}</p>
            })}
        </div>
    }
}
