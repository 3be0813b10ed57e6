//! アップロードエリアコンポーネント
//!
//! 1枚の画像を FileReader で Data URL に読み込み、送信用に変換して渡す。

use leptos::prelude::*;
use soil_ai_common::codec::encode_data_url;
use soil_ai_common::{EncodedImage, Error, SelectedFile};
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileReader, HtmlInputElement};

/// 読み込み結果
pub type FileReadResult = Result<(SelectedFile, EncodedImage), Error>;

#[component]
pub fn UploadArea<F>(
    api_key: ReadSignal<String>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] preview: Signal<Option<String>>,
    on_file_read: F,
) -> impl IntoView
where
    F: Fn(FileReadResult) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let has_key = move || !api_key.get().is_empty();
    let is_enabled = move || has_key() && !busy.get();

    let on_drop = {
        let on_file_read = on_file_read.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if !is_enabled() {
                return;
            }

            if let Some(file) = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0))
            {
                read_file(file, on_file_read.clone());
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if is_enabled() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = {
        let on_file_read = on_file_read.clone();
        move |_| {
            if !is_enabled() {
                return;
            }
            open_file_dialog(on_file_read.clone());
        }
    };

    view! {
        <div
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if !is_enabled() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            {move || match (has_key(), preview.get()) {
                (false, _) => view! {
                    <div class="upload-icon">"🔑"</div>
                    <p>"Enter your Gemini API key"</p>
                    <p class="text-muted">"Set the key above to upload a soil photo"</p>
                }.into_any(),
                (true, Some(url)) => view! {
                    <img class="soil-preview" src=url alt="Selected soil sample" />
                    <p class="text-muted">"Click or drop to choose another image"</p>
                }.into_any(),
                (true, None) => view! {
                    <div class="upload-icon">"📷"</div>
                    <p>"Drag & drop a soil photo, or click to select"</p>
                    <p class="text-muted">"Supported: JPEG, PNG, WebP, HEIC"</p>
                }.into_any(),
            }}
        </div>
    }
}

/// ファイル選択ダイアログを開く
fn open_file_dialog<F>(on_file_read: F)
where
    F: Fn(FileReadResult) + 'static + Clone,
{
    let Some(input) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("input").ok())
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    else {
        web_sys::console::error_1(&"file input could not be created".into());
        return;
    };
    input.set_type("file");
    input.set_accept("image/*");

    let input_clone = input.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
        if let Some(file) = input_clone.files().and_then(|files| files.get(0)) {
            read_file(file, on_file_read.clone());
        }
    }) as Box<dyn FnMut(_)>);

    input.set_onchange(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
    input.click();
}

fn read_file<F>(file: File, on_file_read: F)
where
    F: Fn(FileReadResult) + 'static + Clone,
{
    let selected = SelectedFile {
        name: file.name(),
        mime_type: file.type_(),
        size: file.size() as u64,
    };

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            on_file_read(Err(Error::Encoding(format!("{:?}", e))));
            return;
        }
    };

    let reader_clone = reader.clone();
    let on_load = on_file_read.clone();
    let onload = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let result = reader_clone
            .result()
            .ok()
            .and_then(|r| r.as_string())
            .ok_or_else(|| Error::Encoding("reader returned no data URL".to_string()))
            .and_then(|data_url| encode_data_url(&data_url, &selected.mime_type))
            .map(|image| (selected.clone(), image));
        on_load(result);
    }) as Box<dyn FnMut(_)>);

    let on_error = on_file_read.clone();
    let onerror = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        on_error(Err(Error::Encoding("the file could not be read".to_string())));
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        on_file_read(Err(Error::Encoding(format!("{:?}", e))));
    }
}
