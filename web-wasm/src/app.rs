//! メインアプリケーションコンポーネント
//!
//! 画面状態は共通ライブラリの `Session` が持ち、ここでは
//! イベントを遷移に変換して通信を起動するだけ。

use leptos::prelude::*;
use leptos::task::spawn_local;
use soil_ai_common::{analyze, ask, Error, Session};

use crate::api::gemini::FetchBackend;
use crate::components::{
    AnalysisView, FileReadResult, FollowUpPanel, Header, Loader, SettingsPanel, UploadArea,
};

/// ビルド時に `GEMINI_API_KEY` が与えられていれば初期値にする
fn initial_api_key() -> String {
    option_env!("GEMINI_API_KEY").unwrap_or_default().to_string()
}

fn log_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// 利用者には定型文だけを見せ、詳細はコンソールへ
fn log_error(context: &str, error: &Error) {
    web_sys::console::error_1(&format!("{}: {}", context, error).into());
    if let Error::MalformedResponse { raw, .. } = error {
        web_sys::console::error_1(&format!("raw model response: {}", raw).into());
    }
}

#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let (api_key, set_api_key) = signal(initial_api_key());
    let session = RwSignal::new(Session::new());

    let is_loading = move || session.with(|s| s.state().is_loading);
    let has_analysis = move || session.with(|s| s.analysis().is_some());
    let preview = Memo::new(move |_| {
        session.with(|s| s.state().image.as_ref().map(|image| image.to_data_url()))
    });
    let analysis = Memo::new(move |_| session.with(|s| s.analysis().cloned()));

    // ファイル読み込み完了ハンドラ
    let on_file_read = move |result: FileReadResult| {
        let mut outcome = Ok(());
        session.update(|s| {
            outcome = match result {
                Ok((file, image)) => s.select_file(file, image),
                Err(e) => {
                    log_error("failed to read the selected file", &e);
                    s.fail_file_selection(&e)
                }
            };
        });
        if let Err(rejection) = outcome {
            log_warn(&format!("file selection ignored: {}", rejection));
        }
    };

    // 解析開始ハンドラ
    let on_analyze = move |_: ()| {
        let mut begun = None;
        session.update(|s| begun = Some(s.begin_analysis()));
        let job = match begun {
            Some(Ok(job)) => job,
            Some(Err(rejection)) => {
                log_warn(&format!("analysis not started: {}", rejection));
                return;
            }
            None => return,
        };

        let backend = FetchBackend::new(api_key.get_untracked());
        spawn_local(async move {
            let result = analyze(&backend, &job.image).await;
            if let Err(e) = &result {
                log_error("soil analysis failed", e);
            }
            session.update(|s| {
                if !s.complete_analysis(job.ticket, result) {
                    log_warn("stale analysis result discarded");
                }
            });
        });
    };

    // 追加質問ハンドラ
    let on_ask = move |_: ()| {
        let mut begun = None;
        session.update(|s| begun = Some(s.begin_follow_up()));
        let job = match begun {
            Some(Ok(job)) => job,
            Some(Err(rejection)) => {
                log_warn(&format!("follow-up not started: {}", rejection));
                return;
            }
            None => return,
        };

        let backend = FetchBackend::new(api_key.get_untracked());
        spawn_local(async move {
            let result = ask(&backend, &job.image, &job.analysis, &job.question).await;
            if let Err(e) = &result {
                log_error("follow-up question failed", e);
            }
            session.update(|s| {
                if !s.complete_follow_up(job.ticket, result) {
                    log_warn("stale follow-up answer discarded");
                }
            });
        });
    };

    // リセットハンドラ
    let on_reset = move |_: ()| {
        session.update(|s| s.reset());
    };

    view! {
        <div class="container">
            <Header />

            <SettingsPanel api_key=api_key set_api_key=set_api_key />

            <Show
                when=has_analysis
                fallback=move || view! {
                    <UploadArea
                        api_key=api_key
                        busy=Signal::derive(is_loading)
                        preview=preview
                        on_file_read=on_file_read
                    />

                    {move || session.with(|s| s.error().map(str::to_string)).map(|message| view! {
                        <p class="error-message">{message}</p>
                    })}

                    <Show
                        when=is_loading
                        fallback=move || view! {
                            <button
                                class="btn btn-primary btn-large"
                                disabled=move || api_key.get().is_empty() || !session.with(|s| s.can_analyze())
                                on:click=move |_| on_analyze(())
                            >
                                "Analyze Soil"
                            </button>
                        }
                    >
                        <Loader message="Analyzing your soil..." />
                    </Show>
                }
            >
                {move || analysis.get().map(|analysis| view! {
                    <AnalysisView
                        analysis=analysis
                        image_url=preview.get_untracked()
                        on_reset=on_reset
                    />
                })}
                <FollowUpPanel session=session on_ask=on_ask />
            </Show>
        </div>
    }
}
