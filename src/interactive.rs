//! 対話式の解析ウィザード
//!
//! 画像選択 → 解析 → 結果表示 → 追加質問 → 別の画像（リセット）
//! の流れを `Controller` 経由で進める。

use crate::controller::Controller;
use crate::error::{Result, SoilAiError};
use crate::output::render_analysis;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use soil_ai_common::session::{Phase, Rejection};
use soil_ai_common::GenerativeBackend;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Analyze,
    ChangeImage,
    AskFollowUp,
    AnalyzeAnother,
    Quit,
}

impl WizardAction {
    pub fn label(&self) -> &'static str {
        match self {
            WizardAction::Analyze => "Analyze soil",
            WizardAction::ChangeImage => "Change image",
            WizardAction::AskFollowUp => "Ask a follow-up question",
            WizardAction::AnalyzeAnother => "Analyze another image",
            WizardAction::Quit => "Quit",
        }
    }
}

/// 状態ごとに選べる操作
pub fn actions_for(phase: Phase) -> &'static [WizardAction] {
    match phase {
        Phase::Selected => &[WizardAction::Analyze, WizardAction::ChangeImage, WizardAction::Quit],
        Phase::Analyzed => &[
            WizardAction::AskFollowUp,
            WizardAction::AnalyzeAnother,
            WizardAction::Quit,
        ],
        Phase::Empty | Phase::Analyzing | Phase::AskingFollowUp => &[],
    }
}

/// ウィザードを実行
pub async fn run_wizard<B: GenerativeBackend>(
    controller: &mut Controller<B>,
    initial_image: Option<PathBuf>,
) -> Result<()> {
    println!("🌱 soil-ai - 土壌写真解析\n");

    if let Some(path) = initial_image {
        select_image(controller, &path).await?;
    }

    loop {
        match controller.phase() {
            Phase::Empty => {
                let path: String = Input::new()
                    .with_prompt("Soil image path (empty to quit)")
                    .allow_empty(true)
                    .interact_text()?;
                if path.trim().is_empty() {
                    break;
                }
                select_image(controller, Path::new(path.trim())).await?;
            }
            phase @ (Phase::Selected | Phase::Analyzed) => {
                let actions = actions_for(phase);
                let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
                let choice = Select::new()
                    .with_prompt("What next?")
                    .items(&labels)
                    .default(0)
                    .interact()?;

                match actions[choice] {
                    WizardAction::Analyze => analyze(controller).await?,
                    WizardAction::ChangeImage => {
                        let path: String = Input::new()
                            .with_prompt("New soil image path")
                            .interact_text()?;
                        select_image(controller, Path::new(path.trim())).await?;
                    }
                    WizardAction::AskFollowUp => ask(controller).await?,
                    WizardAction::AnalyzeAnother => {
                        controller.reset();
                        println!();
                    }
                    WizardAction::Quit => break,
                }
            }
            Phase::Analyzing | Phase::AskingFollowUp => {
                return Err(SoilAiError::Rejected(Rejection::Busy));
            }
        }
    }

    println!("👋 Bye");
    Ok(())
}

async fn select_image<B: GenerativeBackend>(controller: &mut Controller<B>, path: &Path) -> Result<()> {
    controller.select_path(path).await?;
    match controller.state().file.as_ref() {
        Some(file) => println!("✔ {} ({}, {} bytes)\n", file.name, file.mime_type, file.size),
        None => print_error(controller.session().error()),
    }
    Ok(())
}

async fn analyze<B: GenerativeBackend>(controller: &mut Controller<B>) -> Result<()> {
    let analysis = with_spinner("Analyzing soil...", controller.analyze())
        .await?
        .cloned();
    match analysis {
        Some(analysis) => println!("\n{}", render_analysis(&analysis)),
        None => print_error(controller.session().error()),
    }
    Ok(())
}

async fn ask<B: GenerativeBackend>(controller: &mut Controller<B>) -> Result<()> {
    let question: String = Input::new()
        .with_prompt("Your question")
        .allow_empty(true)
        .interact_text()?;
    if question.trim().is_empty() {
        println!("Please enter a question.\n");
        return Ok(());
    }

    let answer = with_spinner("Thinking...", controller.ask(&question))
        .await?
        .map(str::to_string);
    match answer {
        Some(answer) => println!("\n💬 {}\n", answer),
        None => print_error(controller.session().follow_up_error()),
    }
    Ok(())
}

async fn with_spinner<F: Future>(message: &'static str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}

fn print_error(message: Option<&str>) {
    if let Some(message) = message {
        println!("⚠ {}\n", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_for_phase() {
        assert_eq!(actions_for(Phase::Selected)[0], WizardAction::Analyze);
        assert_eq!(actions_for(Phase::Analyzed)[0], WizardAction::AskFollowUp);
        assert!(actions_for(Phase::Empty).is_empty());
        assert!(actions_for(Phase::Analyzing).is_empty());
        assert!(actions_for(Phase::Analyzed).contains(&WizardAction::AnalyzeAnother));
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(WizardAction::Quit.label(), "Quit");
        assert_eq!(WizardAction::AnalyzeAnother.label(), "Analyze another image");
    }
}
