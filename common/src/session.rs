//! 画面状態の状態機械
//!
//! アップロード → 解析 → 結果表示 → 追加質問 → リセット の流れを管理する。
//! 状態を変更できるのはこのモジュールのメソッドだけで、
//! 非同期処理（解析・追加質問）はチケットで紐付け、最新でない完了通知は捨てる。
//!
//! ```text
//! Empty --select_file--> Selected --begin_analysis--> Analyzing
//! Analyzing --ok--> Analyzed      Analyzing --err--> Selected (error)
//! Analyzed --begin_follow_up--> AskingFollowUp --ok/err--> Analyzed
//! any --reset--> Empty
//! ```

use thiserror::Error;

use crate::error::Error;
use crate::types::{EncodedImage, SoilAnalysis};

/// 追加質問失敗時の利用者向けメッセージ
pub const FOLLOW_UP_ERROR_MESSAGE: &str =
    "Sorry, the question could not be answered right now. Please try again.";

/// 画面の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    Selected,
    Analyzing,
    Analyzed,
    AskingFollowUp,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Empty => "empty",
            Phase::Selected => "selected",
            Phase::Analyzing => "analyzing",
            Phase::Analyzed => "analyzed",
            Phase::AskingFollowUp => "asking_follow_up",
        }
    }

    /// 通信中か
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Phase::Analyzing | Phase::AskingFollowUp)
    }
}

/// 選択中のファイル情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// 画面に見える状態
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub file: Option<SelectedFile>,
    pub image: Option<EncodedImage>,
    pub analysis: Option<SoilAnalysis>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub follow_up_question: String,
    pub follow_up_answer: Option<String>,
    pub follow_up_error: Option<String>,
    pub is_asking: bool,
}

/// 非同期リクエストの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Analysis,
    FollowUp,
}

/// 発行したリクエストの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    seq: u64,
}

/// 解析開始時に呼び出し側へ渡す材料
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub ticket: RequestTicket,
    pub image: EncodedImage,
}

/// 追加質問開始時に呼び出し側へ渡す材料
#[derive(Debug, Clone)]
pub struct FollowUpJob {
    pub ticket: RequestTicket,
    pub image: EncodedImage,
    pub analysis: SoilAnalysis,
    pub question: String,
}

/// 遷移が許されなかった理由（状態は変化しない）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no image has been selected")]
    NoFileSelected,

    #[error("a request is already in flight")]
    Busy,

    #[error("there is no analysis to ask about")]
    NoAnalysis,

    #[error("the follow-up question is blank")]
    BlankQuestion,

    #[error("the selected file is not an image")]
    NotAnImage,

    #[error("operation not allowed while {0:?}")]
    InvalidPhase(Phase),
}

/// 状態機械本体
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    next_seq: u64,
    analysis_in_flight: Option<RequestTicket>,
    follow_up_in_flight: Option<RequestTicket>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn analysis(&self) -> Option<&SoilAnalysis> {
        self.state.analysis.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn follow_up_answer(&self) -> Option<&str> {
        self.state.follow_up_answer.as_deref()
    }

    pub fn follow_up_error(&self) -> Option<&str> {
        self.state.follow_up_error.as_deref()
    }

    /// 解析ボタンを押せるか
    pub fn can_analyze(&self) -> bool {
        self.state.phase == Phase::Selected && self.state.image.is_some()
    }

    /// 質問送信ボタンを押せるか
    pub fn can_ask(&self) -> bool {
        self.state.phase == Phase::Analyzed
            && self.state.image.is_some()
            && !self.state.follow_up_question.trim().is_empty()
    }

    /// ファイル選択（Empty / Selected / Analyzed から）
    ///
    /// 以前の画像・解析結果・エラー・質問はすべて破棄する。
    pub fn select_file(&mut self, file: SelectedFile, image: EncodedImage) -> Result<(), Rejection> {
        if self.state.phase.is_in_flight() {
            return Err(Rejection::Busy);
        }
        if !crate::codec::is_image_mime_type(&image.mime_type) {
            return Err(Rejection::NotAnImage);
        }

        tracing::info!(file = %file.name, mime_type = %image.mime_type, "image selected");
        self.clear();
        self.state.phase = Phase::Selected;
        self.state.file = Some(file);
        self.state.image = Some(image);
        Ok(())
    }

    /// 画像の読み込みに失敗した場合
    ///
    /// 選択状態を破棄して Empty に戻し、「別の画像を選択」メッセージを残す。
    pub fn fail_file_selection(&mut self, error: &Error) -> Result<(), Rejection> {
        if self.state.phase.is_in_flight() {
            return Err(Rejection::Busy);
        }
        tracing::error!(error = %error, "failed to read selected image");
        self.clear();
        self.state.error = Some(error.user_message().to_string());
        Ok(())
    }

    /// 解析開始（Selected → Analyzing）
    pub fn begin_analysis(&mut self) -> Result<AnalysisJob, Rejection> {
        match self.state.phase {
            Phase::Selected => {}
            Phase::Empty => return Err(Rejection::NoFileSelected),
            Phase::Analyzing | Phase::AskingFollowUp => return Err(Rejection::Busy),
            phase => return Err(Rejection::InvalidPhase(phase)),
        }
        let image = self.state.image.clone().ok_or(Rejection::NoFileSelected)?;

        let ticket = self.issue(RequestKind::Analysis);
        self.analysis_in_flight = Some(ticket);
        self.state.phase = Phase::Analyzing;
        self.state.error = None;
        self.state.analysis = None;
        self.state.is_loading = true;

        Ok(AnalysisJob { ticket, image })
    }

    /// 解析完了（Analyzing → Analyzed / Selected）
    ///
    /// 最新の解析リクエストでなければ何もせず `false` を返す。
    pub fn complete_analysis(
        &mut self,
        ticket: RequestTicket,
        result: crate::error::Result<SoilAnalysis>,
    ) -> bool {
        if self.analysis_in_flight != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale analysis result");
            return false;
        }
        self.analysis_in_flight = None;
        self.state.is_loading = false;

        match result {
            Ok(analysis) => {
                tracing::info!(
                    soil_type = %analysis.soil_type,
                    soil_quality = analysis.soil_quality,
                    "analysis completed"
                );
                self.state.analysis = Some(analysis);
                self.state.phase = Phase::Analyzed;
            }
            Err(e) => {
                tracing::error!(error = %e, "analysis failed");
                self.state.error = Some(e.user_message().to_string());
                self.state.phase = Phase::Selected;
            }
        }
        true
    }

    /// 質問文の入力
    pub fn set_follow_up_question(&mut self, question: impl Into<String>) {
        self.state.follow_up_question = question.into();
    }

    /// 追加質問開始（Analyzed → AskingFollowUp）
    pub fn begin_follow_up(&mut self) -> Result<FollowUpJob, Rejection> {
        match self.state.phase {
            Phase::Analyzed => {}
            Phase::Analyzing | Phase::AskingFollowUp => return Err(Rejection::Busy),
            Phase::Empty | Phase::Selected => return Err(Rejection::NoAnalysis),
        }
        let question = self.state.follow_up_question.trim();
        if question.is_empty() {
            return Err(Rejection::BlankQuestion);
        }
        let question = question.to_string();
        let image = self.state.image.clone().ok_or(Rejection::NoFileSelected)?;
        let analysis = self.state.analysis.clone().ok_or(Rejection::NoAnalysis)?;

        let ticket = self.issue(RequestKind::FollowUp);
        self.follow_up_in_flight = Some(ticket);
        self.state.phase = Phase::AskingFollowUp;
        self.state.follow_up_answer = None;
        self.state.follow_up_error = None;
        self.state.is_asking = true;

        Ok(FollowUpJob {
            ticket,
            image,
            analysis,
            question,
        })
    }

    /// 追加質問完了（AskingFollowUp → Analyzed）
    pub fn complete_follow_up(
        &mut self,
        ticket: RequestTicket,
        result: crate::error::Result<String>,
    ) -> bool {
        if self.follow_up_in_flight != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale follow-up answer");
            return false;
        }
        self.follow_up_in_flight = None;
        self.state.is_asking = false;
        self.state.phase = Phase::Analyzed;

        match result {
            Ok(answer) => {
                self.state.follow_up_answer = Some(answer);
            }
            Err(e) => {
                tracing::error!(error = %e, "follow-up failed");
                self.state.follow_up_error = Some(FOLLOW_UP_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// 初期状態へ戻す（どの状態からでも可）
    ///
    /// 通信中のリクエストは以後の完了通知が無視される。
    pub fn reset(&mut self) {
        tracing::info!(phase = self.state.phase.as_str(), "session reset");
        self.clear();
    }

    fn clear(&mut self) {
        self.state = SessionState::default();
        self.analysis_in_flight = None;
        self.follow_up_in_flight = None;
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_seq += 1;
        RequestTicket {
            kind,
            seq: self.next_seq,
        }
    }
}
