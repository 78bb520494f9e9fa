use anyhow::Result;
use pretty_assertions::assert_eq;
use synclang::core::SyncOptions;

use crate::{FakeBackend, Mode, SyncTest};

#[tokio::test]
async fn test_backend_failure_aborts_without_writes() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en/app.json", r#"{"a": "A", "gone": "G"}"#);
    test.write_file("en/app.json", r#"{"a": "A", "b": "B"}"#)?;
    let fr = r#"{"a": "A-fr", "gone": "G-fr"}"#;
    test.write_file("fr/app.json", fr)?;

    let backend = FakeBackend::with_mode(Mode::Fail);
    let options = SyncOptions {
        retries: 2,
        ..test.options()
    };
    let err = test.run_with(&options, &backend).await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to translate app.json"));
    assert!(message.contains("after 3 attempt(s)"));
    assert!(message.contains("translation service unavailable"));
    assert_eq!(backend.calls().len(), 3);
    // The pending deletion was not written either.
    assert_eq!(test.read_file("fr/app.json")?, fr);

    Ok(())
}

#[tokio::test]
async fn test_unparsable_reply_is_fatal() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("en.json", r#"{"a": "A"}"#)?;
    test.write_file("fr.json", "{}")?;

    let err = test
        .run(&FakeBackend::with_mode(Mode::Garbage))
        .await
        .unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to translate en.json"), "{}", message);
    assert!(!message.contains("<locale>"));
    assert_eq!(test.read_file("fr.json")?, "{}");

    Ok(())
}

#[tokio::test]
async fn test_main_locale_must_exist() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("fr.json", "{}")?;
    test.write_file("de.json", "{}")?;

    let err = test.run(&FakeBackend::new()).await.unwrap_err();

    assert!(err.to_string().contains("Main locale 'en' was not found"));
    assert!(err.to_string().contains("de, fr"));

    Ok(())
}

#[tokio::test]
async fn test_invalid_locale_folder_is_rejected() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("en/app.json", "{}")?;
    test.write_file("English/app.json", "{}")?;

    let err = test.run(&FakeBackend::new()).await.unwrap_err();

    assert!(err.to_string().contains("Invalid locale folder name(s)"));
    assert!(err.to_string().contains("English"));

    Ok(())
}

#[tokio::test]
async fn test_malformed_main_file_is_fatal() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("en.json", r#"{"a": "#)?;
    test.write_file("fr.json", "{}")?;

    let err = test.run(&FakeBackend::new()).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to parse JSON file"));

    Ok(())
}

#[tokio::test]
async fn test_missing_source_dir() -> Result<()> {
    let test = SyncTest::new()?;
    let options = SyncOptions::new(test.root().join("locales"), "en");

    let err = test.run_with(&options, &FakeBackend::new()).await.unwrap_err();

    assert!(err.to_string().contains("does not exist"));

    Ok(())
}
