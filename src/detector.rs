//! 史跡検出処理
//!
//! 画像 → ビジョンモデル → LandmarkResolver の流れをまとめる。
//! フォルダ指定時は1枚ずつ処理し、失敗した画像はエラーを記録して続行する。

use crate::error::Result;
use crate::scanner::{load_image, ImageInfo, ImageInput};
use crate::vision::VisionClient;
use cityconnect_common::{build_detection_prompt, DetectionOutcome, DetectionResponse, LandmarkResolver};
use serde::Serialize;
use tracing::{info, warn};

/// 1枚分の検出結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DetectionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 1枚の画像を判定
///
/// ビジョンモデルの応答が使えない場合は `is_detection_failure()` が
/// true のエラーを返す。
pub async fn detect_image<V: VisionClient>(
    client: &V,
    resolver: &LandmarkResolver,
    image: &ImageInput,
) -> Result<DetectionOutcome> {
    let prompt = build_detection_prompt();
    let raw = client.describe_image(image, &prompt).await?;
    Ok(resolver.resolve(&raw)?)
}

/// 複数画像を順に判定
pub async fn detect_images<V: VisionClient>(
    client: &V,
    resolver: &LandmarkResolver,
    images: &[ImageInfo],
    max_image_size: u32,
) -> Vec<DetectionReport> {
    let mut reports = Vec::with_capacity(images.len());

    for (idx, info) in images.iter().enumerate() {
        info!(file = %info.file_name, progress = %format!("{}/{}", idx + 1, images.len()), "detecting");

        let result = match load_image(info, max_image_size) {
            Ok(image) => detect_image(client, resolver, &image).await,
            Err(e) => Err(e),
        };

        let report = match result {
            Ok(outcome) => DetectionReport {
                file_name: info.file_name.clone(),
                result: Some(outcome.to_response()),
                error: None,
            },
            Err(e) => {
                let message = if e.is_detection_failure() {
                    format!("Failed to parse detection response: {}", e)
                } else {
                    format!("Detection failed: {}", e)
                };
                warn!(file = %info.file_name, error = %e, "detection failed");
                DetectionReport {
                    file_name: info.file_name.clone(),
                    result: None,
                    error: Some(message),
                }
            }
        };
        reports.push(report);
    }

    reports
}
