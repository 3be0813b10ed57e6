use clap::Parser;
use soil_ai_common::{analyze, ask, parse_soil_analysis, SoilAnalysis};
use soil_ai_rust::{cli, codec, config, controller, error, gemini, interactive, output};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use gemini::GeminiClient;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(model) = cli.model.clone() {
        config.model = model;
    }

    match cli.command {
        Commands::Analyze { image, output, json } => {
            let client = GeminiClient::from_config(&config)?;
            let analysis = analyze_file(&client, &image).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("{}", output::render_analysis(&analysis));
            }

            if let Some(path) = output {
                std::fs::write(&path, serde_json::to_string_pretty(&analysis)?)?;
                println!("✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Ask { image, question, analysis } => {
            let client = GeminiClient::from_config(&config)?;
            let prior = match analysis {
                Some(path) => load_analysis(&path)?,
                None => analyze_file(&client, &image).await?,
            };

            let (_, encoded) = codec::encode_file(&image).await?;
            let answer = ask(&client, &encoded, &prior, &question).await?;
            println!("{}", answer);
        }

        Commands::Run { image } => {
            let client = GeminiClient::from_config(&config)?;
            let mut controller = controller::Controller::new(client);
            interactive::run_wizard(&mut controller, image).await?;
        }

        Commands::Config { set_api_key, set_model, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn analyze_file(client: &GeminiClient, image: &Path) -> Result<SoilAnalysis> {
    let (file, encoded) = codec::encode_file(image).await?;
    tracing::info!(file = %file.name, size = file.size, "analyzing");
    Ok(analyze(client, &encoded).await?)
}

/// 保存済みの解析結果を読み込む（受信時と同じ検査を通す）
fn load_analysis(path: &Path) -> Result<SoilAnalysis> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| error::SoilAiError::FileNotFound(path.display().to_string()))?;
    Ok(parse_soil_analysis(&content)?)
}
