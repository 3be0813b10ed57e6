//! セッション制御テスト
//!
//! 固定応答のスタブで 画像選択 → 解析 → 追加質問 → リセット の流れを検証

use soil_ai_common::session::{Phase, Rejection, SessionState};
use soil_ai_common::{Error, GeminiRequest, GenerativeBackend, SoilAnalysis};
use soil_ai_rust::controller::Controller;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

const HAPPY_RESPONSE: &str = r#"{"soilQuality":72,"soilType":"Loam","summary":"...","cropRecommendations":["Wheat","Maize"],"restPeriod":"2-3 months","improvementSteps":["Add compost","Rotate crops"]}"#;

/// 登録順に応答を返すスタブ
#[derive(Default)]
struct ScriptedBackend {
    responses: RefCell<VecDeque<Result<String, String>>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedBackend {
    fn with(responses: Vec<Result<&str, &str>>) -> Self {
        Self {
            responses: RefCell::new(
                responses
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GeminiRequest) -> soil_ai_common::Result<String> {
        self.requests
            .borrow_mut()
            .push(serde_json::to_string(request).expect("シリアライズ失敗"));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response".to_string()))
            .map_err(Error::Service)
    }
}

fn expected_analysis() -> SoilAnalysis {
    SoilAnalysis {
        soil_quality: 72.0,
        soil_type: "Loam".to_string(),
        summary: "...".to_string(),
        crop_recommendations: vec!["Wheat".to_string(), "Maize".to_string()],
        rest_period: "2-3 months".to_string(),
        improvement_steps: vec!["Add compost".to_string(), "Rotate crops".to_string()],
    }
}

fn write_image(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, JPEG_BYTES).expect("画像書き込み失敗");
    path
}

/// シナリオ1: 正常系
#[tokio::test]
async fn test_happy_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![Ok(HAPPY_RESPONSE)]));

    controller.select_path(&write_image(&dir, "soil.jpg")).await.unwrap();
    assert_eq!(controller.phase(), Phase::Selected);
    assert_eq!(controller.state().file.as_ref().unwrap().mime_type, "image/jpeg");

    let analysis = controller.analyze().await.unwrap().cloned();
    assert_eq!(analysis, Some(expected_analysis()));
    assert_eq!(controller.phase(), Phase::Analyzed);
    assert_eq!(controller.state().analysis, Some(expected_analysis()));

    let requests = controller.backend().requests.borrow();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("\"responseSchema\""));
    assert!(requests[0].contains("\"mimeType\":\"image/jpeg\""));
}

/// シナリオ2: 不正な応答
#[tokio::test]
async fn test_malformed_response_returns_to_selected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![Ok("not json")]));

    controller.select_path(&write_image(&dir, "soil.jpg")).await.unwrap();
    let analysis = controller.analyze().await.unwrap();
    assert!(analysis.is_none());

    assert_eq!(controller.phase(), Phase::Selected);
    assert!(controller.state().analysis.is_none());
    assert!(!controller.state().is_loading);
    let message = controller.session().error().expect("エラーメッセージがない");
    assert!(!message.is_empty());
}

/// シナリオ3: 追加質問
#[tokio::test]
async fn test_follow_up_stores_exact_answer() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![
        Ok(HAPPY_RESPONSE),
        Ok("Wheat tolerates loam's moderate drainage."),
    ]));

    controller.select_path(&write_image(&dir, "soil.jpg")).await.unwrap();
    controller.analyze().await.unwrap();

    let answer = controller.ask("Why Wheat?").await.unwrap().map(str::to_string);
    assert_eq!(answer.as_deref(), Some("Wheat tolerates loam's moderate drainage."));
    assert_eq!(controller.phase(), Phase::Analyzed);
    assert_eq!(
        controller.state().follow_up_answer.as_deref(),
        Some("Wheat tolerates loam's moderate drainage.")
    );

    // 追加質問には画像と前回の解析結果が含まれる
    let requests = controller.backend().requests.borrow();
    assert!(requests[1].contains("inlineData"));
    assert!(requests[1].contains("Why Wheat?"));
    assert!(requests[1].contains("Loam"));
    assert!(!requests[1].contains("responseSchema"));
}

/// 追加質問の失敗は解析結果を残したまま汎用メッセージになる
#[tokio::test]
async fn test_follow_up_failure_keeps_analysis() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![
        Ok(HAPPY_RESPONSE),
        Err("503 Service Unavailable"),
    ]));

    controller.select_path(&write_image(&dir, "soil.jpg")).await.unwrap();
    controller.analyze().await.unwrap();

    let answer = controller.ask("Why Wheat?").await.unwrap();
    assert!(answer.is_none());
    assert_eq!(controller.phase(), Phase::Analyzed);
    assert!(controller.session().follow_up_error().is_some());
    assert_eq!(controller.state().analysis, Some(expected_analysis()));
}

/// 空白の質問は送信しない
#[tokio::test]
async fn test_blank_question_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![Ok(HAPPY_RESPONSE)]));

    controller.select_path(&write_image(&dir, "soil.jpg")).await.unwrap();
    controller.analyze().await.unwrap();

    let result = controller.ask("   ").await;
    assert_eq!(result.unwrap_err(), Rejection::BlankQuestion);
    assert_eq!(controller.backend().requests.borrow().len(), 1);
}

/// シナリオ4: リセット
#[tokio::test]
async fn test_reset_returns_to_initial_state() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![
        Ok(HAPPY_RESPONSE),
        Ok("Because."),
    ]));

    controller.select_path(&write_image(&dir, "soil.jpg")).await.unwrap();
    controller.analyze().await.unwrap();
    controller.ask("Why Wheat?").await.unwrap();
    assert_ne!(controller.state(), &SessionState::default());

    controller.reset();
    assert_eq!(controller.state(), &SessionState::default());
    assert_eq!(controller.phase(), Phase::Empty);
}

/// シナリオ5: 解析失敗後に画像を差し替え
#[tokio::test]
async fn test_replacing_file_clears_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::with(vec![Err("500 Internal")]));

    controller.select_path(&write_image(&dir, "a.jpg")).await.unwrap();
    controller.analyze().await.unwrap();
    assert!(controller.session().error().is_some());

    controller.select_path(&write_image(&dir, "b.jpg")).await.unwrap();
    assert_eq!(controller.phase(), Phase::Selected);
    assert!(controller.session().error().is_none());
    assert!(controller.state().analysis.is_none());
    assert_eq!(controller.state().file.as_ref().unwrap().name, "b.jpg");
}

/// 空の状態からは画像選択以外できない
#[tokio::test]
async fn test_empty_state_rejects_analyze_and_ask() {
    let mut controller = Controller::new(ScriptedBackend::default());

    assert_eq!(controller.analyze().await.unwrap_err(), Rejection::NoFileSelected);
    assert_eq!(controller.ask("Why?").await.unwrap_err(), Rejection::NoAnalysis);
    assert_eq!(controller.phase(), Phase::Empty);
    assert!(controller.backend().requests.borrow().is_empty());
}

/// 読めないファイルは「別の画像を選択」
#[tokio::test]
async fn test_unreadable_file_sets_encoding_message() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = Controller::new(ScriptedBackend::default());

    controller
        .select_path(&dir.path().join("missing.jpg"))
        .await
        .unwrap();
    assert_eq!(controller.phase(), Phase::Empty);
    assert_eq!(
        controller.session().error(),
        Some(soil_ai_common::error::ENCODING_MESSAGE)
    );
}
