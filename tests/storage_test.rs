//! 保存先テスト
//!
//! JSONファイルへの永続化と認証・報告の一連の流れを検証

use cityconnect::app;
use cityconnect::config::Config;
use cityconnect::storage::JsonStore;
use cityconnect_common::seed::{DEMO_EMAIL, DEMO_PASSWORD};
use cityconnect_common::{
    seed_demo_data, AuthService, Error as CommonError, IssueFilter, IssueStore, NewIssue,
    PasswordHasher, SessionTokenService, UserStore,
};
use tempfile::tempdir;

fn fast_auth() -> AuthService {
    AuthService::new(
        PasswordHasher::with_iterations(1_000),
        SessionTokenService::new("test-secret"),
    )
}

fn pothole() -> NewIssue {
    NewIssue {
        category: "Pothole".to_string(),
        photo_base64: Some("aGVsbG8=".to_string()),
        latitude: 3.1390,
        longitude: 101.6869,
        address: Some("Jalan Bukit Bintang".to_string()),
        description: None,
    }
}

/// ファイルがなければ空で開く
#[test]
fn test_open_missing_file_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");

    let store = JsonStore::open(&path).unwrap();
    assert!(store.list(&IssueFilter::default()).unwrap().is_empty());
    assert!(store.find_by_email(DEMO_EMAIL).unwrap().is_none());
    assert!(!path.exists());
}

/// 変更は再オープン後も残る
#[test]
fn test_persists_across_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("data.json");
    let auth = fast_auth();

    let (user_id, issue_id) = {
        let mut store = JsonStore::open(&path).unwrap();
        let session = auth.signup(&mut store, "aisyah@example.com", "pw").unwrap();
        let issue = store.create(pothole(), Some(session.user_id)).unwrap();
        store.update_status(issue.id, "in_progress").unwrap();
        (session.user_id, issue.id)
    };

    let store = JsonStore::open(&path).unwrap();
    let session = auth.login(&store, "aisyah@example.com", "pw").unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.username, "aisyah");

    let issue = store.get(issue_id).unwrap().unwrap();
    assert_eq!(issue.status, "in_progress");
    assert_eq!(issue.user_id, Some(user_id));
}

/// 重複メールは再オープン後も拒否される
#[test]
fn test_duplicate_email_after_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    let auth = fast_auth();

    {
        let mut store = JsonStore::open(&path).unwrap();
        auth.signup(&mut store, "dup@example.com", "pw").unwrap();
    }

    let mut store = JsonStore::open(&path).unwrap();
    let err = auth.signup(&mut store, "dup@example.com", "other").unwrap_err();
    assert!(matches!(err, CommonError::DuplicateEmail(_)));
}

/// バージョン不一致はデータを捨てずにエラー
#[test]
fn test_version_mismatch_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    std::fs::write(&path, r#"{"version": 99, "users": [], "issues": []}"#).unwrap();

    let err = JsonStore::open(&path).unwrap_err();
    assert!(matches!(err, CommonError::Config(_)));

    // ファイルは残っている
    assert!(std::fs::read_to_string(&path).unwrap().contains("99"));
}

/// 壊れたファイルはJSONエラー
#[test]
fn test_corrupted_file_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    std::fs::write(&path, "not json").unwrap();

    let err = JsonStore::open(&path).unwrap_err();
    assert!(matches!(err, CommonError::Json(_)));
}

/// デモデータ投入後にデモユーザーでログインできる
#[test]
fn test_seeded_store_allows_demo_login() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    let auth = fast_auth();

    {
        let mut store = JsonStore::open(&path).unwrap();
        assert!(seed_demo_data(&mut store, auth.hasher()).unwrap());
    }

    let mut store = JsonStore::open(&path).unwrap();
    // 2回目は投入しない
    assert!(!seed_demo_data(&mut store, auth.hasher()).unwrap());
    assert_eq!(store.list(&IssueFilter::default()).unwrap().len(), 3);

    let session = auth.login(&store, DEMO_EMAIL, DEMO_PASSWORD).unwrap();
    let claims = auth
        .current_user(Some(&format!("Bearer {}", session.token)))
        .unwrap();
    assert_eq!(claims.email, DEMO_EMAIL);
    assert_eq!(claims.user_id, session.user_id);
}

/// 設定に従ってデータファイルを開く
#[test]
fn test_open_store_from_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let hasher = PasswordHasher::with_iterations(1_000);

    let config = Config {
        data_path: Some(dir.path().join("data.json")),
        seed_demo_data: false,
        ..Default::default()
    };
    let store = app::open_store(&config, &hasher).unwrap();
    assert_eq!(store.path(), dir.path().join("data.json").as_path());
    assert!(store.find_by_email(DEMO_EMAIL).unwrap().is_none());

    let config = Config {
        seed_demo_data: true,
        ..config
    };
    let store = app::open_store(&config, &hasher).unwrap();
    assert!(store.find_by_email(DEMO_EMAIL).unwrap().is_some());
}

/// 報告の絞り込みと並び順
#[test]
fn test_list_filters_newest_first() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = JsonStore::open(&dir.path().join("data.json")).unwrap();

    let first = store.create(pothole(), None).unwrap();
    let second = store
        .create(NewIssue { category: "Street Light".to_string(), ..pothole() }, None)
        .unwrap();
    store.update_status(first.id, "resolved").unwrap();

    let all = store.list(&IssueFilter::default()).unwrap();
    assert_eq!(all.iter().map(|i| i.id).collect::<Vec<_>>(), vec![second.id, first.id]);

    let resolved = store
        .list(&IssueFilter { status: Some("resolved".to_string()), category: None })
        .unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, first.id);

    assert!(store.update_status(9999, "resolved").unwrap().is_none());
}

/// 保存は一時ファイル経由で置き換え、作業ファイルを残さない
#[test]
fn test_save_replaces_file_without_leftovers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    let auth = fast_auth();

    let mut store = JsonStore::open(&path).unwrap();
    auth.signup(&mut store, "first@example.com", "pw").unwrap();
    for _ in 0..3 {
        store.create(pothole(), None).unwrap();
    }

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["data.json".to_string()]);
}

/// 既存ファイルは切り詰めずに別ファイルで置き換える
#[cfg(unix)]
#[test]
fn test_save_does_not_truncate_existing_file() {
    use std::io::Read;

    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    let auth = fast_auth();

    let mut store = JsonStore::open(&path).unwrap();
    auth.signup(&mut store, "first@example.com", "pw").unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    // 保存前に開いたハンドルは古い内容を指したまま
    let mut old_handle = std::fs::File::open(&path).unwrap();
    auth.signup(&mut store, "second@example.com", "pw").unwrap();

    let mut old_content = String::new();
    old_handle.read_to_string(&mut old_content).unwrap();
    assert_eq!(old_content, before);
    assert!(!old_content.contains("second@example.com"));

    let reopened = JsonStore::open(&path).unwrap();
    assert!(reopened.find_by_email("first@example.com").unwrap().is_some());
    assert!(reopened.find_by_email("second@example.com").unwrap().is_some());
}
