//! ビジョンモデル呼び出し
//!
//! 画像とプロンプトを渡して応答テキストを受け取るだけのブラックボックス。
//! 応答の解釈は cityconnect_common::LandmarkResolver が行う。

mod anthropic;
mod claude_cli;

pub use anthropic::AnthropicClient;
pub use claude_cli::ClaudeCli;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::ImageInput;

#[allow(async_fn_in_trait)]
pub trait VisionClient {
    /// 画像を説明させ、生の応答テキストを返す
    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String>;
}

/// 設定に応じたクライアント
pub enum Vision {
    Api(AnthropicClient),
    Claude(ClaudeCli),
}

impl Vision {
    pub fn from_config(provider: AiProvider, config: &Config) -> Result<Self> {
        match provider {
            AiProvider::Api => Ok(Vision::Api(AnthropicClient::new(
                config.get_api_key()?,
                config.model.clone(),
                config.max_tokens,
                config.timeout_seconds,
            )?)),
            AiProvider::Claude => Ok(Vision::Claude(ClaudeCli::new())),
        }
    }
}

impl VisionClient for Vision {
    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        match self {
            Vision::Api(client) => client.describe_image(image, prompt).await,
            Vision::Claude(cli) => cli.describe_image(image, prompt).await,
        }
    }
}
