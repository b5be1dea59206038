//! プロンプト生成モジュール

/// 史跡検出用プロンプト
///
/// 応答は `{detected, siteName, confidence, description}` のJSONを想定。
/// モデルが前置きを付けても parser 側で抽出する。
pub fn build_detection_prompt() -> String {
    r#"Analyze this image and determine if it contains a heritage site or historical landmark.
If it does, respond with JSON in this exact format:
{
    "detected": true,
    "siteName": "name of the site",
    "confidence": 0.95,
    "description": "brief description"
}
If it doesn't contain a heritage site, respond with:
{
    "detected": false,
    "confidence": 0.0
}
Only respond with valid JSON, no other text."#
        .to_string()
}
