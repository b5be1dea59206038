//! 史跡照合モジュール
//!
//! モデル応答 → JSON抽出 → デコード → カタログ照合 の順に処理し、
//! DetectionOutcome を返す。応答が使えない場合（JSONなし・不正JSON）は
//! `Err` として返し、「史跡なし」とは区別する。

use crate::catalog::LandmarkCatalog;
use crate::error::Result;
use crate::parser::parse_detection_response;
use crate::types::{DetectionOutcome, HeritageSite};
use std::sync::Arc;
use tracing::{debug, warn};

/// カタログを注入して使う照合器
#[derive(Debug, Clone)]
pub struct LandmarkResolver {
    catalog: Arc<LandmarkCatalog>,
}

impl LandmarkResolver {
    pub fn new(catalog: Arc<LandmarkCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &LandmarkCatalog {
        &self.catalog
    }

    /// モデル応答テキストを照合結果に変換
    ///
    /// # Returns
    /// * `Ok(DetectionOutcome)` - 史跡なし / カタログ一致 / カタログ外
    /// * `Err` - `Error::Extraction` または `Error::Decode`（検出失敗）
    pub fn resolve(&self, raw_model_text: &str) -> Result<DetectionOutcome> {
        let detection = parse_detection_response(raw_model_text).map_err(|e| {
            warn!(error = %e, response_len = raw_model_text.len(), "unusable vision response");
            e
        })?;

        if !detection.detected {
            debug!("no landmark in image");
            return Ok(DetectionOutcome::NotDetected);
        }

        let site_name = detection.site_name.unwrap_or_default();
        if let Some(site) = self.catalog.find_by_fuzzy_name(&site_name) {
            debug!(candidate = %site_name, site_id = site.id, "catalog match");
            return Ok(DetectionOutcome::Matched(site.clone()));
        }

        debug!(candidate = %site_name, "no catalog entry, synthesizing site");
        let description = detection.description.unwrap_or_default();
        Ok(DetectionOutcome::Unmatched(HeritageSite::unknown(
            &site_name,
            &description,
        )))
    }
}
