//! Anthropic Messages API 連携

use super::VisionClient;
use crate::error::{CityConnectError, Result};
use crate::scanner::ImageInput;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const MESSAGES_API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Messages APIリクエスト
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

/// Messages APIレスポンス
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String, max_tokens: u32, timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model,
            max_tokens,
        })
    }
}

impl VisionClient for AnthropicClient {
    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        let request = build_request(&self.model, self.max_tokens, image, prompt);

        debug!(file = %image.file_name, model = %self.model, "calling messages api");
        let response = self
            .http
            .post(MESSAGES_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CityConnectError::ApiCall(format!("API error {}: {}", status, body)));
        }

        let body: MessagesResponse = response.json().await?;
        first_text(body)
    }
}

fn build_request<'a>(
    model: &'a str,
    max_tokens: u32,
    image: &'a ImageInput,
    prompt: &'a str,
) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens,
        messages: vec![Message {
            role: "user",
            content: vec![
                ContentBlock::Image {
                    source: ImageSource {
                        kind: "base64",
                        media_type: &image.mime_type,
                        data: &image.data_base64,
                    },
                },
                ContentBlock::Text { text: prompt },
            ],
        }],
    }
}

fn first_text(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| CityConnectError::ApiCall("応答にテキストが含まれていません".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let image = ImageInput::from_bytes("kl.jpg", "image/jpeg", b"jpeg");
        let request = build_request("model-x", 1024, &image, "What is this?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "model-x");
        assert_eq!(json["max_tokens"], 1024);
        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/jpeg");
        assert_eq!(content[0]["source"]["data"], image.data_base64.as_str());
        assert_eq!(content[1]["type"], "text");
        assert_eq!(content[1]["text"], "What is this?");
    }

    #[test]
    fn test_first_text_block() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "{\"detected\": false}"}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).unwrap(), r#"{"detected": false}"#);
    }

    #[test]
    fn test_first_text_missing() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(first_text(response), Err(CityConnectError::ApiCall(_))));
    }
}
