//! 応答スキーマ
//!
//! Geminiの `responseSchema` として送る生成制約。
//! サービス側の自己検証には頼らず、受信側でも `parser` が同じ契約を検査する。

use serde_json::{json, Value};

/// 必須フィールド（JSON上の名前）
pub const REQUIRED_FIELDS: [&str; 6] = [
    "soilQuality",
    "soilType",
    "summary",
    "cropRecommendations",
    "restPeriod",
    "improvementSteps",
];

/// SoilAnalysisの応答スキーマ
pub fn soil_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "soilQuality": {
                "type": "NUMBER",
                "description": "A numerical score from 0 (very poor) to 100 (excellent) representing the overall health of the soil."
            },
            "soilType": {
                "type": "STRING",
                "description": "A string identifying the primary soil type (e.g., 'Sandy', 'Clay', 'Loam', 'Silt', 'Peat', 'Chalky')."
            },
            "summary": {
                "type": "STRING",
                "description": "A concise, one-paragraph summary of the soil's condition."
            },
            "cropRecommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of strings, listing crops that are well-suited for this type of soil."
            },
            "restPeriod": {
                "type": "STRING",
                "description": "A string suggesting an appropriate fallow or rest period for the soil to recover nutrients (e.g., '2-3 months', 'One planting season')."
            },
            "improvementSteps": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of strings providing actionable steps to improve the soil quality. If the soil is excellent, suggest steps to maintain its health."
            }
        },
        "required": REQUIRED_FIELDS,
        "propertyOrdering": REQUIRED_FIELDS
    })
}
