//! CLI command tests

use tempfile::tempdir;

use crate::commands;

#[test]
fn test_init_creates_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-running init on an existing database is fine
    commands::cmd_init(&path).unwrap();
}

#[tokio::test]
async fn test_say_adds_expense() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    commands::cmd_say(&path, 1, "spent 500 on groceries", false)
        .await
        .unwrap();

    let db = commands::open_db(&path).unwrap();
    let stored = db.get_transactions(1, None, None, None, None, None).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category_name.as_deref(), Some("Food & Dining"));
}

#[tokio::test]
async fn test_say_rejects_empty_message() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    assert!(commands::cmd_say(&path, 1, "   ", false).await.is_err());
}

#[test]
fn test_reports_on_empty_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    commands::cmd_init(&path).unwrap();

    commands::cmd_recent(&path, 1, 5).unwrap();
    commands::cmd_forecast(&path, 1).unwrap();
    commands::cmd_alerts(&path, 1).unwrap();
    commands::cmd_recommend(&path, 1).unwrap();
    commands::cmd_status(&path, 1).unwrap();
}
