//! ビジョンモデル応答パーサー
//!
//! モデルの応答テキストから JSON オブジェクトを抽出し、
//! DetectionResult にデコードする。応答は前置き・後書き付きでも構わない。

use crate::error::{Error, Result};
use crate::types::DetectionResult;
use regex::Regex;
use serde_json::Value;

lazy_static::lazy_static! {
    // 最初の `{` から最後の `}` まで（改行を含む、貪欲）
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// 応答テキストからJSONオブジェクト部分を抽出
///
/// 応答に含まれるJSONオブジェクトは1つだけという前提で、
/// 最初の `{` から最後の `}` までをそのまま返す。
///
/// # Examples
/// ```
/// use cityconnect_common::extract_json;
///
/// let response = "Sure! {\"detected\": false} Hope this helps.";
/// assert_eq!(extract_json(response).unwrap(), "{\"detected\": false}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    JSON_OBJECT
        .find(response)
        .map(|m| m.as_str())
        .ok_or(Error::Extraction)
}

/// 抽出済みJSONをDetectionResultにデコード
///
/// 失敗するのはJSONとして不正な場合のみ。欠けたフィールドや
/// 型の合わない値は既定値で埋める。
pub fn decode_detection(json: &str) -> Result<DetectionResult> {
    let value: Value = serde_json::from_str(json).map_err(Error::Decode)?;

    let detected = value
        .get("detected")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !detected {
        return Ok(DetectionResult::default());
    }

    let site_name = value
        .get("siteName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let description = value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    // キーなしは 0、数値でない値は不明（None）
    let confidence = match value.get("confidence") {
        None => Some(0.0),
        Some(c) => c.as_f64().map(|c| c.clamp(0.0, 1.0)),
    };

    Ok(DetectionResult {
        detected,
        site_name: Some(site_name),
        confidence,
        description: Some(description),
    })
}

/// 応答テキストを抽出→デコードまで一括処理
pub fn parse_detection_response(response: &str) -> Result<DetectionResult> {
    let json_str = extract_json(response)?;
    decode_detection(json_str)
}
