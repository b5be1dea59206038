mod encode;
mod exif;

pub use encode::{load_image, ImageInput};
pub use exif::extract_gps;

use crate::error::{CityConnectError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// 対応拡張子とMIMEタイプ（拡張子は小文字で比較）
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// 拡張子からMIMEタイプを判定
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// ファイルまたはフォルダ直下の画像を列挙
pub fn scan_path(path: &Path) -> Result<Vec<ImageInfo>> {
    if path.is_file() {
        let mime_type = mime_type_for(path).ok_or_else(|| {
            CityConnectError::ImageLoad(format!("未対応の画像形式: {}", path.display()))
        })?;
        return Ok(vec![image_info(path, mime_type)]);
    }

    scan_folder(path)
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(CityConnectError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(mime_type) = mime_type_for(path) {
            images.push(image_info(path, mime_type));
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn image_info(path: &Path, mime_type: &'static str) -> ImageInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    ImageInfo {
        path: path.to_path_buf(),
        file_name,
        mime_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a.png")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("a.webp")), Some("image/webp"));
        assert_eq!(mime_type_for(Path::new("a.txt")), None);
        assert_eq!(mime_type_for(Path::new("noext")), None);
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_folder_with_images() {
        let temp_dir = std::env::temp_dir().join("cityconnect-test-images");
        fs::create_dir_all(&temp_dir).unwrap();

        File::create(temp_dir.join("test1.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.join("test2.JPG")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.join("test3.png")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.join("readme.txt")).unwrap().write_all(b"text").unwrap();

        let result = scan_folder(&temp_dir).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "test1.jpg");
        assert_eq!(result[1].file_name, "test2.JPG");
        assert_eq!(result[2].file_name, "test3.png");
        assert_eq!(result[2].mime_type, "image/png");

        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_scan_path_single_file() {
        let temp_dir = std::env::temp_dir().join("cityconnect-test-single");
        fs::create_dir_all(&temp_dir).unwrap();
        let file = temp_dir.join("tower.jpeg");
        File::create(&file).unwrap().write_all(b"dummy").unwrap();

        let result = scan_path(&file).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file_name, "tower.jpeg");

        let text = temp_dir.join("notes.txt");
        File::create(&text).unwrap().write_all(b"text").unwrap();
        assert!(matches!(scan_path(&text), Err(CityConnectError::ImageLoad(_))));

        fs::remove_dir_all(&temp_dir).ok();
    }
}
