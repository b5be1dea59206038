use crate::error::{CityConnectError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// 署名鍵が未設定のときに使う開発用の既定値
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    pub jwt_secret: Option<String>,
    /// ユーザー・報告の保存先（省略時は設定ディレクトリ）
    pub data_path: Option<PathBuf>,
    /// 史跡カタログJSON（省略時は組み込みデータ）
    pub catalog_path: Option<PathBuf>,
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-3-5-sonnet-20241022".into(),
            max_tokens: 1024,
            max_image_size: 1568, // Claude Vision推奨サイズ
            timeout_seconds: 120,
            jwt_secret: None,
            data_path: None,
            catalog_path: None,
            seed_demo_data: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CityConnectError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cityconnect"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// データファイルの場所
    pub fn data_file(&self) -> Result<PathBuf> {
        match &self.data_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("data.json")),
        }
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            return Ok(key);
        }

        self.api_key.clone().ok_or(CityConnectError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_jwt_secret(&mut self, secret: String) -> Result<()> {
        self.jwt_secret = Some(secret);
        self.save()
    }

    /// トークン署名鍵（環境変数 JWT_SECRET を優先）
    pub fn signing_secret(&self) -> String {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            return secret;
        }

        match &self.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                warn!("JWT_SECRET is not set, using the development default");
                DEFAULT_JWT_SECRET.to_string()
            }
        }
    }
}
