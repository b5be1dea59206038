//! JSONファイル保存先
//!
//! MemoryStore をそのままJSONに書き出す。変更のたびに保存する。

use cityconnect_common::{
    Credential, Error, IssueFilter, IssueReport, IssueStore, MemoryStore, NewIssue, Result,
    UserStore,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// ファイル構造
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    #[serde(flatten)]
    data: MemoryStore,
}

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: MemoryStore,
}

impl JsonStore {
    const CURRENT_VERSION: u32 = 1;

    /// ファイルを開く（存在しなければ空）
    ///
    /// バージョン不一致はユーザーデータを捨てないようエラーにする。
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                data: MemoryStore::new(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let file: StoreFile = serde_json::from_reader(reader)?;
        if file.version != Self::CURRENT_VERSION {
            return Err(Error::Config(format!(
                "データファイルのバージョンが不一致です: {} (expected {})",
                file.version,
                Self::CURRENT_VERSION
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            data: file.data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 同じディレクトリの一時ファイルに書いてから置き換える
    ///
    /// 書き込み途中で失敗しても元のファイルは壊れない。
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let file = StoreFile {
            version: Self::CURRENT_VERSION,
            data: self.data.clone(),
        };

        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &file)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}

impl UserStore for JsonStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
        self.data.find_by_email(email)
    }

    fn find_by_id(&self, user_id: i64) -> Result<Option<Credential>> {
        self.data.find_by_id(user_id)
    }

    fn insert(&mut self, email: &str, password_hash: &str, username: &str) -> Result<i64> {
        let user_id = self.data.insert(email, password_hash, username)?;
        self.save()?;
        Ok(user_id)
    }
}

impl IssueStore for JsonStore {
    fn create(&mut self, issue: NewIssue, user_id: Option<i64>) -> Result<IssueReport> {
        let report = self.data.create(issue, user_id)?;
        self.save()?;
        Ok(report)
    }

    fn list(&self, filter: &IssueFilter) -> Result<Vec<IssueReport>> {
        self.data.list(filter)
    }

    fn get(&self, issue_id: i64) -> Result<Option<IssueReport>> {
        self.data.get(issue_id)
    }

    fn update_status(&mut self, issue_id: i64, status: &str) -> Result<Option<IssueReport>> {
        let updated = self.data.update_status(issue_id, status)?;
        if updated.is_some() {
            self.save()?;
        }
        Ok(updated)
    }
}
