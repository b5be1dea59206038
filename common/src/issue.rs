//! 市民からの不具合報告（道路の穴、街灯故障など）の型定義
//!
//! ステータスは自由記述の文字列で、遷移ルールは持たない。

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 新規報告の既定ステータス
pub const DEFAULT_STATUS: &str = "pending";

/// 一覧表示時に残す写真データの文字数
const PHOTO_PREVIEW_CHARS: usize = 100;

/// 保存済みの報告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    pub id: i64,
    /// 匿名報告の場合は None
    pub user_id: Option<i64>,
    pub category: String,
    pub photo_base64: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IssueReport {
    /// 写真データを先頭100文字に切り詰めたコピー（一覧用）
    pub fn preview(&self) -> Self {
        let photo_base64 = self
            .photo_base64
            .as_ref()
            .map(|p| p.chars().take(PHOTO_PREVIEW_CHARS).collect());
        Self {
            photo_base64,
            ..self.clone()
        }
    }
}

/// 新規報告の入力
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub category: String,
    pub photo_base64: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: Option<String>,
}

impl NewIssue {
    /// カテゴリと写真は必須
    pub fn validate(&self) -> Result<()> {
        let has_photo = self
            .photo_base64
            .as_deref()
            .is_some_and(|p| !p.is_empty());
        if self.category.trim().is_empty() || !has_photo {
            return Err(Error::Validation("Category and photo are required".into()));
        }
        Ok(())
    }
}

/// 一覧の絞り込み条件（指定された項目は完全一致）
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &IssueReport) -> bool {
        self.status.as_deref().map_or(true, |s| issue.status == s)
            && self.category.as_deref().map_or(true, |c| issue.category == c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: &str, category: &str) -> IssueReport {
        let now = Utc::now();
        IssueReport {
            id: 1,
            user_id: None,
            category: category.to_string(),
            photo_base64: Some("A".repeat(250)),
            latitude: 3.14,
            longitude: 101.68,
            address: None,
            description: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_validate_requires_category_and_photo() {
        let mut issue = NewIssue {
            category: "Pothole".into(),
            photo_base64: Some("aGVsbG8=".into()),
            latitude: 3.14,
            longitude: 101.68,
            ..Default::default()
        };
        assert!(issue.validate().is_ok());

        issue.photo_base64 = Some(String::new());
        assert!(matches!(issue.validate(), Err(Error::Validation(_))));

        issue.photo_base64 = Some("aGVsbG8=".into());
        issue.category = "  ".into();
        assert!(matches!(issue.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_preview_truncates_photo() {
        let preview = report("pending", "Pothole").preview();
        assert_eq!(preview.photo_base64.map(|p| p.len()), Some(PHOTO_PREVIEW_CHARS));
    }

    #[test]
    fn test_preview_keeps_missing_photo() {
        let mut issue = report("pending", "Pothole");
        issue.photo_base64 = None;
        assert!(issue.preview().photo_base64.is_none());
    }

    #[test]
    fn test_filter_matches() {
        let issue = report("in_progress", "Street Light");
        assert!(IssueFilter::default().matches(&issue));
        assert!(IssueFilter {
            status: Some("in_progress".into()),
            category: Some("Street Light".into()),
        }
        .matches(&issue));
        assert!(!IssueFilter {
            status: Some("pending".into()),
            category: None,
        }
        .matches(&issue));
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_string(&report("pending", "Garbage")).unwrap();
        assert!(json.contains("\"photoBase64\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"userId\":null"));
    }
}
