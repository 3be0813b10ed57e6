//! Soil AI Common Library
//!
//! CLIとWeb(WASM)で共有される型・リクエスト契約・画面状態機械

pub mod types;
pub mod error;
pub mod codec;
pub mod prompts;
pub mod schema;
pub mod request;
pub mod parser;
pub mod backend;
pub mod client;
pub mod session;

pub use types::{EncodedImage, QualityBand, SoilAnalysis};
pub use error::{Error, Result};
pub use backend::GenerativeBackend;
pub use client::{analyze, ask};
pub use parser::{extract_json, parse_soil_analysis};
pub use request::{GeminiRequest, GeminiResponse, DEFAULT_MODEL, GEMINI_API_BASE_URL};
pub use session::{Phase, Rejection, SelectedFile, Session, SessionState};
