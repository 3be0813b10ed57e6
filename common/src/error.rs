//! エラー型定義

use thiserror::Error;

/// 解析失敗時の利用者向けメッセージ
pub const ENCODING_MESSAGE: &str =
    "This image could not be read. Please select another image.";
pub const SERVICE_MESSAGE: &str =
    "Failed to reach the analysis service. Please check your connection and try again.";
pub const MALFORMED_MESSAGE: &str =
    "Failed to analyze the soil. The model may be unable to process this image. Please try another one.";
pub const CONFIG_MESSAGE: &str = "The application is not configured correctly.";

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 画像ファイルを読み込めない
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// 通信・認証・クォータ・5xxなどサービス側の失敗
    #[error("Service error: {0}")]
    Service(String),

    /// モデルの応答がJSONでない、またはスキーマに合わない
    #[error("The model returned an invalid data format: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// 画面に出すメッセージ（詳細はログのみ）
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Encoding(_) | Error::Io(_) => ENCODING_MESSAGE,
            Error::Service(_) => SERVICE_MESSAGE,
            Error::MalformedResponse { .. } | Error::Json(_) => MALFORMED_MESSAGE,
            Error::Config(_) => CONFIG_MESSAGE,
        }
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Error::MalformedResponse { .. })
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_encoding() {
        let error = Error::Encoding("unexpected end of file".to_string());
        assert_eq!(format!("{}", error), "Encoding error: unexpected end of file");
    }

    #[test]
    fn test_error_display_malformed_hides_raw_text() {
        let error = Error::malformed("expected value at line 1 column 1", "not json");
        let display = format!("{}", error);
        assert!(display.contains("invalid data format"));
        assert!(!display.contains("not json"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert_eq!(error.user_message(), ENCODING_MESSAGE);
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_user_messages_per_kind() {
        assert_eq!(Error::Service("503".into()).user_message(), SERVICE_MESSAGE);
        assert_eq!(Error::malformed("x", "y").user_message(), MALFORMED_MESSAGE);
        assert!(Error::malformed("x", "y").is_malformed_response());
        assert!(!Error::Service("timeout".into()).is_malformed_response());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("APIキー未設定".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("APIキー未設定"));
    }
}
