//! デモデータ投入
//!
//! 空の保存先にデモユーザーとサンプル報告を入れる。

use crate::error::Result;
use crate::issue::{IssueFilter, NewIssue};
use crate::password::PasswordHasher;
use crate::store::{IssueStore, UserStore};
use tracing::info;

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_USERNAME: &str = "Demo User";

/// (カテゴリ, 緯度, 経度, 住所, 説明, ステータス)
const SAMPLE_ISSUES: &[(&str, f64, f64, &str, &str, &str)] = &[
    ("Pothole", 3.1415, 101.6860, "Jalan Raja, Kuala Lumpur", "Large pothole causing traffic disruptions", "pending"),
    ("Street Light", 3.1420, 101.6880, "Bukit Bintang", "Street light not working for 3 nights", "in_progress"),
    ("Garbage", 3.1400, 101.6900, "KLCC Park", "Overflowing trash bins", "resolved"),
];

/// デモデータを投入（既にあるものは触らない）
///
/// # Returns
/// 何か投入した場合は true
pub fn seed_demo_data<S>(store: &mut S, hasher: &PasswordHasher) -> Result<bool>
where
    S: UserStore + IssueStore,
{
    let mut seeded = false;

    let demo_user_id = match store.find_by_email(DEMO_EMAIL)? {
        Some(user) => user.user_id,
        None => {
            seeded = true;
            store.insert(DEMO_EMAIL, &hasher.hash(DEMO_PASSWORD), DEMO_USERNAME)?
        }
    };

    if store.list(&IssueFilter::default())?.is_empty() {
        for &(category, latitude, longitude, address, description, status) in SAMPLE_ISSUES {
            let issue = store.create(
                NewIssue {
                    category: category.to_string(),
                    photo_base64: None,
                    latitude,
                    longitude,
                    address: Some(address.to_string()),
                    description: Some(description.to_string()),
                },
                Some(demo_user_id),
            )?;
            store.update_status(issue.id, status)?;
        }
        seeded = true;
    }

    if seeded {
        info!("demo data seeded");
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_seed_empty_store() {
        let hasher = PasswordHasher::with_iterations(1_000);
        let mut store = MemoryStore::new();

        assert!(seed_demo_data(&mut store, &hasher).unwrap());
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.issue_count(), 3);

        let demo = store.find_by_email(DEMO_EMAIL).unwrap().unwrap();
        assert!(hasher.verify(DEMO_PASSWORD, &demo.password_hash));

        let resolved = store
            .list(&IssueFilter {
                status: Some("resolved".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].category, "Garbage");
        assert_eq!(resolved[0].user_id, Some(demo.user_id));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let hasher = PasswordHasher::with_iterations(1_000);
        let mut store = MemoryStore::new();
        seed_demo_data(&mut store, &hasher).unwrap();

        assert!(!seed_demo_data(&mut store, &hasher).unwrap());
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.issue_count(), 3);
    }
}
