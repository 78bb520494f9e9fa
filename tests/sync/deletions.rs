use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{FakeBackend, SyncTest, strings};

#[tokio::test]
async fn test_deleted_key_removed_without_backend_call() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en/app.json", r#"{"a": "A", "b": "B", "gone": "G"}"#);
    test.write_file("en/app.json", r#"{"a": "A", "b": "B"}"#)?;
    test.write_file("fr/app.json", r#"{"a": "A-fr", "b": "B-fr", "gone": "G-fr"}"#)?;
    test.write_file("de/app.json", r#"{"a": "A-de", "b": "B-de", "gone": "G-de"}"#)?;

    let backend = FakeBackend::new();
    let summary = test.run(&backend).await?;

    assert!(backend.calls().is_empty());
    assert_eq!(summary.keys_deleted, 1);
    assert_eq!(summary.files_written, 2);

    for locale in ["fr", "de"] {
        let flat = test.read_flat(&format!("{}/app.json", locale))?;
        assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    Ok(())
}

#[tokio::test]
async fn test_deleting_last_nested_key_drops_parent() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en.json", r#"{"a": "A", "group": {"only": "O"}}"#);
    test.write_file("en.json", r#"{"a": "A"}"#)?;
    test.write_file("fr.json", r#"{"a": "A-fr", "group": {"only": "O-fr"}}"#)?;

    test.run(&FakeBackend::new()).await?;

    assert_eq!(test.read_file("fr.json")?, "{\n  \"a\": \"A-fr\"\n}\n");

    Ok(())
}

#[tokio::test]
async fn test_delete_and_add_in_one_run() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en.json", r#"{"old": "Old", "keep": "Keep"}"#);
    test.write_file("en.json", r#"{"keep": "Keep", "new": "New"}"#)?;
    test.write_file("fr.json", r#"{"old": "Old-fr", "keep": "Keep-fr"}"#)?;

    let backend = FakeBackend::new();
    let summary = test.run(&backend).await?;

    assert_eq!(summary.keys_deleted, 1);
    assert_eq!(summary.keys_added, 1);
    assert_eq!(backend.calls()[0].keys, strings(&["new"]));

    let fr = test.read_flat("fr.json")?;
    assert_eq!(fr.keys().collect::<Vec<_>>(), vec!["keep", "new"]);
    assert_eq!(fr["keep"], "Keep-fr");

    Ok(())
}

#[tokio::test]
async fn test_locale_without_deleted_key_is_left_alone() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en/app.json", r#"{"a": "A", "gone": "G"}"#);
    test.write_file("en/app.json", r#"{"a": "A"}"#)?;
    test.write_file("de/app.json", r#"{"a": "A-de", "gone": "G-de"}"#)?;
    let fr = r#"{"a":"A-fr","extra":"manual"}"#;
    test.write_file("fr/app.json", fr)?;

    let backend = FakeBackend::new();
    let summary = test.run(&backend).await?;

    assert!(backend.calls().is_empty());
    assert_eq!(summary.keys_deleted, 1);
    assert_eq!(summary.files_written, 1);
    assert_eq!(test.read_file("de/app.json")?, "{\n  \"a\": \"A-de\"\n}\n");
    assert_eq!(test.read_file("fr/app.json")?, fr);

    Ok(())
}
