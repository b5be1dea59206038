//! 検出結果・史跡の型定義
//!
//! - DetectionResult: モデル応答をデコードした生の検出結果
//! - HeritageSite: カタログの史跡エントリ（照合できなかった場合の仮レコードも同じ型）
//! - DetectionOutcome: 照合後の三値の結果

use serde::{Deserialize, Serialize};

/// カタログ外の史跡に割り当てる固定ID
pub const UNKNOWN_SITE_ID: i64 = 999;

/// カタログ外の史跡に使う既定座標（クアラルンプール中心部）
pub const FALLBACK_LATITUDE: f64 = 3.1413;
pub const FALLBACK_LONGITUDE: f64 = 101.6964;

const UNKNOWN_HISTORICAL_PERIOD: &str = "Historic";

/// モデル応答からデコードした検出結果
///
/// `detected` が false の場合、他のフィールドはすべて `None`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub detected: bool,
    pub site_name: Option<String>,
    /// 0.0〜1.0 にクランプ済み。キーがなければ 0、数値でなければ `None`
    pub confidence: Option<f64>,
    pub description: Option<String>,
}

/// 史跡エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageSite {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub historical_period: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_wheelchair_accessible: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl HeritageSite {
    /// カタログに該当がない検出から仮レコードを生成
    ///
    /// 名称・説明はデコード結果をそのまま使う（空文字も補完しない）。
    pub fn unknown(name: &str, description: &str) -> Self {
        Self {
            id: UNKNOWN_SITE_ID,
            name: name.to_string(),
            description: description.to_string(),
            historical_period: UNKNOWN_HISTORICAL_PERIOD.to_string(),
            latitude: FALLBACK_LATITUDE,
            longitude: FALLBACK_LONGITUDE,
            is_wheelchair_accessible: false,
            image_url: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_SITE_ID
    }
}

/// 照合結果
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// モデルが「史跡なし」と回答
    NotDetected,
    /// カタログのエントリに一致
    Matched(HeritageSite),
    /// 検出されたがカタログに該当なし（仮レコード）
    Unmatched(HeritageSite),
}

impl DetectionOutcome {
    pub fn is_detected(&self) -> bool {
        !matches!(self, DetectionOutcome::NotDetected)
    }

    pub fn site(&self) -> Option<&HeritageSite> {
        match self {
            DetectionOutcome::NotDetected => None,
            DetectionOutcome::Matched(site) | DetectionOutcome::Unmatched(site) => Some(site),
        }
    }

    /// 呼び出し元へ返すレスポンス形式に変換
    pub fn to_response(&self) -> DetectionResponse {
        match self.site() {
            Some(site) => DetectionResponse {
                detected: true,
                site: Some(site.clone()),
                message: None,
            },
            None => DetectionResponse {
                detected: false,
                site: None,
                message: Some("No heritage site detected in the image".to_string()),
            },
        }
    }
}

/// 検出レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResponse {
    pub detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<HeritageSite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
