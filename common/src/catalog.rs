//! 史跡カタログモジュール
//!
//! 起動時に一度だけ構築し、以後は読み取り専用で共有する。
//! 名称照合は大文字小文字を無視した部分一致（双方向）で、
//! 登録順に最初に一致したものを採用する。スコアリングはしない。

use crate::error::{Error, Result};
use crate::types::HeritageSite;
use std::collections::HashSet;

/// 既知の史跡一覧
#[derive(Debug, Clone, Default)]
pub struct LandmarkCatalog {
    sites: Vec<HeritageSite>,
}

impl LandmarkCatalog {
    /// 登録順を保ったままカタログを構築
    ///
    /// IDの重複はエラー。
    pub fn new(sites: Vec<HeritageSite>) -> Result<Self> {
        let mut seen = HashSet::new();
        for site in &sites {
            if !seen.insert(site.id) {
                return Err(Error::Config(format!(
                    "史跡IDが重複しています: {} ({})",
                    site.id, site.name
                )));
            }
        }
        Ok(Self { sites })
    }

    /// 組み込みの史跡データ
    pub fn seeded() -> Self {
        Self {
            sites: seed_sites(),
        }
    }

    /// JSON文字列（HeritageSiteの配列）から読み込み
    pub fn from_json_str(json: &str) -> Result<Self> {
        let sites: Vec<HeritageSite> = serde_json::from_str(json)?;
        Self::new(sites)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 名称のあいまい照合
    ///
    /// 候補名がエントリ名を含む、またはエントリ名が候補名を含む場合に一致。
    pub fn find_by_fuzzy_name(&self, candidate: &str) -> Option<&HeritageSite> {
        let candidate = candidate.to_lowercase();
        self.sites.iter().find(|site| {
            let name = site.name.to_lowercase();
            candidate.contains(&name) || name.contains(&candidate)
        })
    }

    /// 史跡一覧（`wheelchair_only` が true なら車椅子対応のみ）
    pub fn list(&self, wheelchair_only: bool) -> Vec<&HeritageSite> {
        self.sites
            .iter()
            .filter(|site| !wheelchair_only || site.is_wheelchair_accessible)
            .collect()
    }

    /// IDで検索
    pub fn get(&self, id: i64) -> Option<&HeritageSite> {
        self.sites.iter().find(|site| site.id == id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

fn seed_sites() -> Vec<HeritageSite> {
    vec![
        HeritageSite {
            id: 1,
            name: "Sultan Abdul Samad Building".into(),
            description: "A historic building in Kuala Lumpur, Malaysia. Built in 1894-1897, it served as the main administrative office of the British colonial government. The building features a distinctive Moorish Revival architecture with a large copper dome.".into(),
            historical_period: "Colonial Era (1894-1897)".into(),
            latitude: 3.1413,
            longitude: 101.6964,
            is_wheelchair_accessible: true,
            image_url: None,
        },
        HeritageSite {
            id: 2,
            name: "Petronas Twin Towers".into(),
            description: "The iconic twin towers of Kuala Lumpur, completed in 1998. Standing at 452 meters, they were the tallest buildings in the world at the time. The towers feature a unique postmodern style inspired by Islamic architecture.".into(),
            historical_period: "Modern Era (1998)".into(),
            latitude: 3.1578,
            longitude: 101.7123,
            is_wheelchair_accessible: true,
            image_url: None,
        },
        HeritageSite {
            id: 3,
            name: "Batu Caves".into(),
            description: "A limestone hill with a series of caves and cave temples in Gombak, Selangor. The main cave is a massive natural cavern, and the site is home to a large statue of Lord Murugan. It is one of the oldest Hindu temples in Southeast Asia.".into(),
            historical_period: "Ancient (Pre-1800s)".into(),
            latitude: 3.2426,
            longitude: 101.6853,
            is_wheelchair_accessible: false,
            image_url: None,
        },
    ]
}
