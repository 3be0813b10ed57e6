use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soil-ai")]
#[command(about = "土壌写真AI解析ツール（Gemini）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 使用するモデル（設定ファイルより優先）
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 土壌写真を解析
    Analyze {
        /// 画像ファイルのパス（PNG/JPEG/WEBP）
        #[arg(required = true)]
        image: PathBuf,

        /// 解析結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 結果をJSONで標準出力に表示
        #[arg(long)]
        json: bool,
    },

    /// 解析結果について追加質問
    Ask {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 質問文
        #[arg(short, long, value_parser = parse_question)]
        question: String,

        /// 保存済みの解析結果JSON（省略時は先に解析する）
        #[arg(short, long)]
        analysis: Option<PathBuf>,
    },

    /// 対話式で解析・追加質問を行う
    Run {
        /// 最初に選択する画像
        image: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 既定のモデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 空白だけの質問は受け付けない
pub fn parse_question(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err("question must not be blank".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question() {
        assert_eq!(parse_question("  Why Wheat? ").unwrap(), "Why Wheat?");
        assert!(parse_question("   ").is_err());
        assert!(parse_question("").is_err());
    }

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from(["soil-ai", "ask", "soil.jpg", "-q", "Why Wheat?"]).unwrap();
        match cli.command {
            Commands::Ask { image, question, analysis } => {
                assert_eq!(image, PathBuf::from("soil.jpg"));
                assert_eq!(question, "Why Wheat?");
                assert!(analysis.is_none());
            }
            _ => panic!("Askを期待"),
        }
    }

    #[test]
    fn test_cli_rejects_blank_question() {
        let result = Cli::try_parse_from(["soil-ai", "ask", "soil.jpg", "-q", "  "]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["soil-ai", "analyze", "soil.png", "--json", "-v", "--model", "gemini-pro"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.model.as_deref(), Some("gemini-pro"));
        assert!(matches!(cli.command, Commands::Analyze { json: true, .. }));
    }
}
