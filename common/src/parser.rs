//! APIレスポンスパーサー
//!
//! モデルの応答テキストを SoilAnalysis に変換する。
//! スキーマ制約付きで生成させていても、受信側で必須項目・型・範囲を検査する。

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::schema::REQUIRED_FIELDS;
use crate::types::{SoilAnalysis, QUALITY_MAX, QUALITY_MIN};

/// 応答からJSON部分を取り出す
///
/// ```json ... ``` で囲まれていれば中身を、そうでなければ前後の空白を除いた全体を返す。
///
/// # Examples
/// ```
/// use soil_ai_common::extract_json;
///
/// let response = "```json\n{\"soilType\": \"Clay\"}\n```";
/// assert_eq!(extract_json(response), "{\"soilType\": \"Clay\"}");
/// ```
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    for marker in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }
    trimmed
}

/// 解析レスポンスをパース
///
/// # Returns
/// * `Ok(SoilAnalysis)` - 6項目すべてが正しい型で揃っている
/// * `Err(Error::MalformedResponse)` - JSONでない、オブジェクトでない、項目欠落、型不一致、範囲外
pub fn parse_soil_analysis(response: &str) -> Result<SoilAnalysis> {
    let json_str = extract_json(response);

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::malformed(format!("JSONパースエラー: {}", e), response))?;

    let Value::Object(map) = value else {
        return Err(Error::malformed("JSONオブジェクトではありません", response));
    };

    if let Some(missing) = first_missing_field(&map) {
        return Err(Error::malformed(format!("必須項目がありません: {}", missing), response));
    }

    let analysis: SoilAnalysis = serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::malformed(format!("型が一致しません: {}", e), response))?;

    validate_quality(analysis.soil_quality, response)?;

    Ok(analysis)
}

fn first_missing_field(map: &Map<String, Value>) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| map.get(*field).map_or(true, Value::is_null))
}

/// soilQuality は[0,100]のみ受け付ける
fn validate_quality(score: f64, raw: &str) -> Result<()> {
    if !score.is_finite() || !(QUALITY_MIN..=QUALITY_MAX).contains(&score) {
        return Err(Error::malformed(
            format!("soilQualityが範囲外です: {}", score),
            raw,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_json() -> Value {
        json!({
            "soilQuality": 72,
            "soilType": "Loam",
            "summary": "Dark, crumbly loam with good structure.",
            "cropRecommendations": ["Wheat", "Maize"],
            "restPeriod": "2-3 months",
            "improvementSteps": ["Add compost", "Rotate crops"]
        })
    }

    fn assert_malformed(result: Result<SoilAnalysis>) {
        match result {
            Err(Error::MalformedResponse { .. }) => {}
            other => panic!("MalformedResponseを期待: {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_response() {
        let analysis = parse_soil_analysis(&valid_json().to_string()).unwrap();
        assert_eq!(analysis.soil_quality, 72.0);
        assert_eq!(analysis.soil_type, "Loam");
        assert_eq!(analysis.crop_recommendations, vec!["Wheat", "Maize"]);
        assert_eq!(analysis.rest_period, "2-3 months");
        assert_eq!(analysis.improvement_steps, vec!["Add compost", "Rotate crops"]);
    }

    #[test]
    fn test_parse_fenced_response() {
        let response = format!("```json\n{}\n```", valid_json());
        let analysis = parse_soil_analysis(&response).unwrap();
        assert_eq!(analysis.soil_type, "Loam");
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_soil_analysis("not json");
        match result {
            Err(Error::MalformedResponse { raw, .. }) => assert_eq!(raw, "not json"),
            other => panic!("MalformedResponseを期待: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_each_missing_field() {
        for field in REQUIRED_FIELDS {
            let mut value = valid_json();
            value.as_object_mut().unwrap().remove(field);
            let result = parse_soil_analysis(&value.to_string());
            match result {
                Err(Error::MalformedResponse { reason, .. }) => {
                    assert!(reason.contains(field), "{} の欠落が報告されない: {}", field, reason)
                }
                other => panic!("{} 欠落時にMalformedResponseを期待: {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_parse_rejects_null_field() {
        let mut value = valid_json();
        value["summary"] = Value::Null;
        assert_malformed(parse_soil_analysis(&value.to_string()));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let mut value = valid_json();
        value["soilQuality"] = json!("72");
        assert_malformed(parse_soil_analysis(&value.to_string()));

        let mut value = valid_json();
        value["cropRecommendations"] = json!("Wheat, Maize");
        assert_malformed(parse_soil_analysis(&value.to_string()));

        let mut value = valid_json();
        value["improvementSteps"] = json!([1, 2]);
        assert_malformed(parse_soil_analysis(&value.to_string()));
    }

    #[test]
    fn test_parse_rejects_array_root() {
        let response = format!("[{}]", valid_json());
        assert_malformed(parse_soil_analysis(&response));
    }

    #[test]
    fn test_parse_rejects_out_of_range_quality() {
        let mut value = valid_json();
        value["soilQuality"] = json!(140);
        assert_malformed(parse_soil_analysis(&value.to_string()));

        value["soilQuality"] = json!(-1);
        assert_malformed(parse_soil_analysis(&value.to_string()));
    }

    #[test]
    fn test_parse_accepts_boundaries_and_fractions() {
        for score in [0.0, 55.5, 100.0] {
            let mut value = valid_json();
            value["soilQuality"] = json!(score);
            let analysis = parse_soil_analysis(&value.to_string()).unwrap();
            assert_eq!(analysis.soil_quality, score);
        }
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let mut value = valid_json();
        value["confidence"] = json!(0.9);
        assert!(parse_soil_analysis(&value.to_string()).is_ok());
    }

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_bare_fence() {
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
