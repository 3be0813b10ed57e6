//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有されるプロンプト:
//! - ANALYSIS_PROMPT: 土壌解析用の固定指示
//! - build_follow_up_prompt: 追加質問用プロンプト（前回の解析結果を文脈として埋め込む）

use crate::error::Result;
use crate::types::SoilAnalysis;

/// 土壌解析プロンプト
pub const ANALYSIS_PROMPT: &str = "You are an expert agricultural scientist specializing in soil health and regenerative farming. \
Analyze this soil image and provide a detailed analysis based on the provided JSON schema. \
Do not include any introductory text, markdown formatting, or explanations in your response. \
Only the JSON object is allowed.";

/// 追加質問プロンプト生成
///
/// # Arguments
/// * `analysis` - 直前の解析結果（JSONとして文脈に埋め込む）
/// * `question` - 利用者の質問（空でないことは呼び出し側が保証する）
pub fn build_follow_up_prompt(analysis: &SoilAnalysis, question: &str) -> Result<String> {
    let analysis_json = serde_json::to_string_pretty(analysis)?;

    Ok(format!(
        r#"You are an expert agricultural scientist specializing in soil health and regenerative farming.
You previously analyzed the attached soil image and produced this analysis:

```json
{analysis_json}
```

Answer the farmer's follow-up question below. Ground your answer in the image and the analysis above.
Reply in plain prose. Do not repeat the analysis verbatim.

Question: {question}"#,
        question = question.trim(),
    ))
}
