//! soil-ai: 土壌写真をGeminiで解析するCLI
//!
//! 共通ロジック（リクエスト契約・パーサー・状態機械）は `soil_ai_common` にあり、
//! このクレートはファイル読み込み・HTTP送信・端末での対話を担当する。

pub mod cli;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod gemini;
pub mod interactive;
pub mod output;
