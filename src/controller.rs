//! セッション制御
//!
//! `Session`（状態機械）を唯一の所有者として保持し、
//! 画像読み込み・解析・追加質問の非同期処理をつなぐ。

use crate::codec::encode_file;
use soil_ai_common::session::{Phase, Rejection, Session, SessionState};
use soil_ai_common::{analyze, ask, GenerativeBackend, SoilAnalysis};
use std::path::Path;

pub struct Controller<B> {
    backend: B,
    session: Session,
}

impl<B: GenerativeBackend> Controller<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 画像ファイルを選択
    ///
    /// 読み込みに失敗した場合は選択を破棄してエラーメッセージを残す。
    pub async fn select_path(&mut self, path: &Path) -> Result<(), Rejection> {
        if self.session.phase().is_in_flight() {
            return Err(Rejection::Busy);
        }
        match encode_file(path).await {
            Ok((file, image)) => self.session.select_file(file, image),
            Err(e) => self.session.fail_file_selection(&e),
        }
    }

    /// 解析を実行し、成功すれば結果を返す
    pub async fn analyze(&mut self) -> Result<Option<&SoilAnalysis>, Rejection> {
        let job = self.session.begin_analysis()?;
        let result = analyze(&self.backend, &job.image).await;
        self.session.complete_analysis(job.ticket, result);
        Ok(self.session.analysis())
    }

    /// 追加質問を実行し、回答があれば返す
    pub async fn ask(&mut self, question: &str) -> Result<Option<&str>, Rejection> {
        self.session.set_follow_up_question(question);
        let job = self.session.begin_follow_up()?;
        let result = ask(&self.backend, &job.image, &job.analysis, &job.question).await;
        self.session.complete_follow_up(job.ticket, result);
        Ok(self.session.follow_up_answer())
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}
