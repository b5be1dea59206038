use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityConnectError {
    #[error(transparent)]
    Common(#[from] cityconnect_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`cityconnect config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

impl CityConnectError {
    /// ビジョンモデルの応答が使えなかった（「史跡なし」とは別）
    pub fn is_detection_failure(&self) -> bool {
        matches!(self, CityConnectError::Common(e) if e.is_detection_failure())
    }
}

pub type Result<T> = std::result::Result<T, CityConnectError>;
