//! 設定から各コンポーネントを組み立てる

use crate::config::Config;
use crate::error::Result;
use crate::storage::JsonStore;
use cityconnect_common::{
    seed_demo_data, AuthService, LandmarkCatalog, LandmarkResolver, PasswordHasher,
    SessionTokenService,
};
use std::sync::Arc;
use tracing::info;

/// カタログを読み込む（catalog_path 未指定なら組み込みデータ）
pub fn load_catalog(config: &Config) -> Result<LandmarkCatalog> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = LandmarkCatalog::from_file(path)?;
            info!(path = %path.display(), sites = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        None => Ok(LandmarkCatalog::seeded()),
    }
}

pub fn build_resolver(config: &Config) -> Result<LandmarkResolver> {
    Ok(LandmarkResolver::new(Arc::new(load_catalog(config)?)))
}

pub fn build_auth(config: &Config) -> AuthService {
    AuthService::new(
        PasswordHasher::new(),
        SessionTokenService::new(config.signing_secret()),
    )
}

/// データファイルを開き、必要ならデモデータを投入
pub fn open_store(config: &Config, hasher: &PasswordHasher) -> Result<JsonStore> {
    let mut store = JsonStore::open(&config.data_file()?)?;
    if config.seed_demo_data {
        seed_demo_data(&mut store, hasher)?;
    }
    Ok(store)
}
