//! API連携モジュール

pub mod gemini;
