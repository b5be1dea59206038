//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// モデル応答に `{...}` が含まれない
    #[error("応答にJSONオブジェクトが見つかりません")]
    Extraction,

    /// `{...}` は見つかったがJSONとして不正
    #[error("検出結果のJSONパースエラー: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// 未登録メールとパスワード不一致は区別しない
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("入力エラー: {0}")]
    Validation(String),

    #[error("見つかりません: {0}")]
    NotFound(String),
}

impl Error {
    /// 上流の応答が使えなかったことを示すエラーか
    ///
    /// `Extraction` と `Decode` は「ランドマークなし」とは別扱い。
    pub fn is_detection_failure(&self) -> bool {
        matches!(self, Error::Extraction | Error::Decode(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
