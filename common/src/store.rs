//! 永続化の契約とメモリ実装
//!
//! ユーザーと不具合報告の保存は外部の責務で、ここでは
//! 最小限の読み書きの契約（トレイト）だけを定める。
//! MemoryStore はテストと JSON ファイル保存の土台に使う。

use crate::error::{Error, Result};
use crate::issue::{IssueFilter, IssueReport, NewIssue, DEFAULT_STATUS};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 保存済みの認証情報
///
/// `password_hash` は呼び出し元に返さない。
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub username: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .field("username", &self.username)
            .finish()
    }
}

/// ユーザー保存先
pub trait UserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Credential>>;

    fn find_by_id(&self, user_id: i64) -> Result<Option<Credential>>;

    /// 登録済みのメールアドレスなら `Error::DuplicateEmail`
    fn insert(&mut self, email: &str, password_hash: &str, username: &str) -> Result<i64>;
}

/// 不具合報告の保存先
pub trait IssueStore {
    fn create(&mut self, issue: NewIssue, user_id: Option<i64>) -> Result<IssueReport>;

    /// 新しい順
    fn list(&self, filter: &IssueFilter) -> Result<Vec<IssueReport>>;

    fn get(&self, issue_id: i64) -> Result<Option<IssueReport>>;

    /// 該当IDがなければ `Ok(None)`
    fn update_status(&mut self, issue_id: i64, status: &str) -> Result<Option<IssueReport>>;
}

/// メモリ上の保存先
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    users: Vec<Credential>,
    #[serde(default)]
    issues: Vec<IssueReport>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

impl UserStore for MemoryStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    fn find_by_id(&self, user_id: i64) -> Result<Option<Credential>> {
        Ok(self.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    fn insert(&mut self, email: &str, password_hash: &str, username: &str) -> Result<i64> {
        if self.users.iter().any(|u| u.email == email) {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let user_id = self.users.iter().map(|u| u.user_id).max().unwrap_or(0) + 1;
        self.users.push(Credential {
            user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            username: username.to_string(),
        });
        Ok(user_id)
    }
}

impl IssueStore for MemoryStore {
    fn create(&mut self, issue: NewIssue, user_id: Option<i64>) -> Result<IssueReport> {
        let id = self.issues.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let report = IssueReport {
            id,
            user_id,
            category: issue.category,
            photo_base64: issue.photo_base64,
            latitude: issue.latitude,
            longitude: issue.longitude,
            address: issue.address,
            description: issue.description,
            status: DEFAULT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.issues.push(report.clone());
        Ok(report)
    }

    fn list(&self, filter: &IssueFilter) -> Result<Vec<IssueReport>> {
        let mut issues: Vec<IssueReport> = self
            .issues
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        issues.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(issues)
    }

    fn get(&self, issue_id: i64) -> Result<Option<IssueReport>> {
        Ok(self.issues.iter().find(|i| i.id == issue_id).cloned())
    }

    fn update_status(&mut self, issue_id: i64, status: &str) -> Result<Option<IssueReport>> {
        let Some(issue) = self.issues.iter_mut().find(|i| i.id == issue_id) else {
            return Ok(None);
        };
        issue.status = status.to_string();
        issue.updated_at = Utc::now();
        Ok(Some(issue.clone()))
    }
}
