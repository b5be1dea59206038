//! 送信用の画像データ作成
//!
//! 長辺が上限を超える画像は縮小してJPEGに再エンコードする。
//! デコードできない画像は元のバイト列のまま送る。

use super::ImageInfo;
use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::FilterType;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::{debug, warn};

/// ビジョンモデル・報告保存に渡す画像
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub data_base64: String,
}

impl ImageInput {
    pub fn from_bytes(file_name: &str, mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            path: PathBuf::from(file_name),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            data_base64: STANDARD.encode(bytes),
        }
    }
}

/// 画像を読み込み、必要なら縮小してBase64化
pub fn load_image(info: &ImageInfo, max_size: u32) -> Result<ImageInput> {
    let bytes = std::fs::read(&info.path)?;

    let (bytes, mime_type) = match downscale(&bytes, max_size) {
        Ok(Some(jpeg)) => {
            debug!(file = %info.file_name, "image downscaled");
            (jpeg, "image/jpeg")
        }
        Ok(None) => (bytes, info.mime_type),
        Err(e) => {
            warn!(file = %info.file_name, error = %e, "image decode failed, sending original bytes");
            (bytes, info.mime_type)
        }
    };

    Ok(ImageInput {
        path: info.path.clone(),
        file_name: info.file_name.clone(),
        mime_type: mime_type.to_string(),
        data_base64: STANDARD.encode(&bytes),
    })
}

/// 長辺が `max_size` を超える場合のみ縮小JPEGを返す（0は無制限）
fn downscale(bytes: &[u8], max_size: u32) -> std::result::Result<Option<Vec<u8>>, image::ImageError> {
    if max_size == 0 {
        return Ok(None);
    }

    let img = image::load_from_memory(bytes)?;
    if img.width().max(img.height()) <= max_size {
        return Ok(None);
    }

    let resized = img.resize(max_size, max_size, FilterType::Lanczos3);
    let rgb = image::DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)?;
    Ok(Some(out))
}
