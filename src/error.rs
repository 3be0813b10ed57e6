use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY を設定するか `soil-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("操作できません: {0}")]
    Rejected(#[from] soil_ai_common::Rejection),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] soil_ai_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for SoilAiError {
    fn from(e: dialoguer::Error) -> Self {
        SoilAiError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SoilAiError>;
