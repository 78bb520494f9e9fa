use anyhow::Result;
use pretty_assertions::assert_eq;
use synclang::core::{SyncOptions, SyncSummary};

use crate::{FakeBackend, Mode, SyncTest, strings};

#[tokio::test]
async fn test_first_run_translates_every_key() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file(
        "en/common.json",
        r#"{"title": "Hello", "nav": {"home": "Home", "about": "About"}}"#,
    )?;
    test.create_dir("fr")?;
    test.create_dir("de")?;

    let backend = FakeBackend::new();
    let options = SyncOptions {
        batch_size: 2,
        ..test.options()
    };
    let summary = test.run_with(&options, &backend).await?;

    assert_eq!(
        summary,
        SyncSummary {
            keys_modified: 0,
            keys_deleted: 0,
            keys_added: 3,
            files_written: 2,
        }
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].targets, strings(&["de", "fr"]));
    assert_eq!(calls[0].keys, strings(&["title", "nav.home"]));
    assert_eq!(calls[1].keys, strings(&["nav.about"]));

    assert_eq!(
        test.read_file("fr/common.json")?,
        r#"{
  "title": "[fr] Hello",
  "nav": {
    "home": "[fr] Home",
    "about": "[fr] About"
  }
}
"#
    );
    assert_eq!(test.read_flat("de/common.json")?["nav.home"], "[de] Home");

    Ok(())
}

#[tokio::test]
async fn test_only_changed_keys_are_sent() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en/app.json", r#"{"a": "A", "b": "B", "c": "C"}"#);
    test.write_file("en/app.json", r#"{"a": "A", "b": "B2", "c": "C", "d": "D"}"#)?;
    test.write_file("fr/app.json", r#"{"a": "A-fr", "b": "B-fr", "c": "C-fr"}"#)?;
    test.write_file("de/app.json", r#"{"a": "A-de", "b": "B-de", "c": "C-de"}"#)?;

    let backend = FakeBackend::new();
    let summary = test.run(&backend).await?;

    assert_eq!(summary.keys_added, 1);
    assert_eq!(summary.keys_modified, 1);
    assert_eq!(summary.files_written, 2);

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].targets, strings(&["de", "fr"]));
    assert_eq!(calls[0].keys, strings(&["d", "b"]));

    let fr = test.read_flat("fr/app.json")?;
    assert_eq!(fr.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    assert_eq!(fr["a"], "A-fr");
    assert_eq!(fr["b"], "[fr] B2");
    assert_eq!(fr["c"], "C-fr");
    assert_eq!(fr["d"], "[fr] D");

    Ok(())
}

#[tokio::test]
async fn test_locale_specific_gaps_get_their_own_pass() -> Result<()> {
    let mut test = SyncTest::new()?;
    let main = r#"{"x": "X", "y": "Y", "z": "Z"}"#;
    test.write_committed("en/app.json", main)?;
    test.write_file("fr/app.json", r#"{"y": "Y-fr", "z": "Z-fr"}"#)?;
    test.write_file("de/app.json", r#"{"z": "Z-de"}"#)?;

    let backend = FakeBackend::new();
    let summary = test.run(&backend).await?;

    // Nothing changed in the main locale; only gaps were filled.
    assert_eq!(summary.keys_added + summary.keys_modified + summary.keys_deleted, 0);
    assert_eq!(summary.files_written, 2);

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].targets, strings(&["de", "fr"]));
    assert_eq!(calls[0].keys, strings(&["x"]));
    assert_eq!(calls[1].targets, strings(&["de"]));
    assert_eq!(calls[1].keys, strings(&["y"]));

    let fr = test.read_flat("fr/app.json")?;
    assert_eq!(fr["x"], "[fr] X");
    assert_eq!(fr["y"], "Y-fr");
    let de = test.read_flat("de/app.json")?;
    assert_eq!(de["y"], "[de] Y");
    assert_eq!(de["z"], "Z-de");

    Ok(())
}

#[tokio::test]
async fn test_single_target_gaps_are_locale_specific() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.write_committed("en.json", r#"{"a": "A", "b": "B"}"#)?;
    test.write_file("fr.json", r#"{"a": "A-fr"}"#)?;

    let backend = FakeBackend::new();
    test.run(&backend).await?;

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].targets, strings(&["fr"]));
    assert_eq!(calls[0].keys, strings(&["b"]));

    Ok(())
}

#[tokio::test]
async fn test_output_follows_main_key_order() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.commit("en/app.json", r#"{"a": "A", "c": "C"}"#);
    test.write_file("en/app.json", r#"{"a": "A", "b": "B", "c": "C"}"#)?;
    test.write_file("fr/app.json", r#"{"c": "C-fr", "a": "A-fr"}"#)?;

    // The fake backend replies in reverse key order.
    let backend = FakeBackend::new();
    test.run(&backend).await?;

    assert_eq!(
        test.read_file("fr/app.json")?,
        "{\n  \"a\": \"A-fr\",\n  \"b\": \"[fr] B\",\n  \"c\": \"C-fr\"\n}\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_blank_line_after_closing_brace() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file(
        "en.json",
        r#"{"auth": {"login": "Log in"}, "home": {"title": "Home"}}"#,
    )?;
    test.write_file("fr.json", "{}")?;

    test.run(&FakeBackend::new()).await?;

    insta::assert_snapshot!(test.read_file("fr.json")?, @r#"
    {
      "auth": {
        "login": "[fr] Log in"
      },

      "home": {
        "title": "[fr] Home"
      }
    }
    "#);

    Ok(())
}

#[tokio::test]
async fn test_force_retranslates_everything() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.write_committed("en.json", r#"{"a": "A", "b": "B"}"#)?;
    test.write_file("fr.json", r#"{"a": "A-fr", "b": "B-fr"}"#)?;

    let backend = FakeBackend::new();
    let options = SyncOptions {
        force: true,
        ..test.options()
    };
    let summary = test.run_with(&options, &backend).await?;

    assert_eq!(summary.keys_modified, 2);
    assert_eq!(summary.keys_added, 0);
    assert_eq!(backend.calls()[0].keys, strings(&["a", "b"]));

    let fr = test.read_flat("fr.json")?;
    assert_eq!(fr["a"], "[fr] A");
    assert_eq!(fr["b"], "[fr] B");

    Ok(())
}

#[tokio::test]
async fn test_nothing_to_do_writes_nothing() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.write_committed("en/app.json", r#"{"a": "A"}"#)?;
    // Hand-formatted file with an extra key stays untouched.
    let fr = r#"{"a":"A-fr","extra":"kept"}"#;
    test.write_file("fr/app.json", fr)?;

    let backend = FakeBackend::new();
    let summary = test.run(&backend).await?;

    assert_eq!(summary, SyncSummary::default());
    assert!(backend.calls().is_empty());
    assert_eq!(test.read_file("fr/app.json")?, fr);

    Ok(())
}

#[tokio::test]
async fn test_empty_translation_counts_as_missing() -> Result<()> {
    let mut test = SyncTest::new()?;
    test.write_committed("en.json", r#"{"a": "A", "b": "B"}"#)?;
    test.write_file("fr.json", r#"{"a": "", "b": "B-fr"}"#)?;

    let backend = FakeBackend::new();
    test.run(&backend).await?;

    assert_eq!(backend.calls()[0].keys, strings(&["a"]));
    assert_eq!(test.read_flat("fr.json")?["a"], "[fr] A");

    Ok(())
}

#[tokio::test]
async fn test_prompt_names_targets_and_protected_terms() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("en.json", r#"{"brand": "Welcome to Acme"}"#)?;
    test.write_file("ja.json", "{}")?;

    let backend = FakeBackend::new();
    let options = SyncOptions {
        do_not_translate: strings(&["Acme"]),
        ..test.options()
    };
    test.run_with(&options, &backend).await?;

    let prompt = &backend.calls()[0].prompt;
    assert!(prompt.contains("\"en\""));
    assert!(prompt.contains("ja"));
    assert!(prompt.contains("Acme"));

    Ok(())
}

#[tokio::test]
async fn test_dotted_keys_survive_a_sync() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("en.json", r#"{"errors": {"file.missing": "File missing"}}"#)?;
    test.write_file("fr.json", "{}")?;

    let backend = FakeBackend::new();
    test.run(&backend).await?;

    assert_eq!(backend.calls()[0].keys, strings(&["errors.file~|~missing"]));
    assert_eq!(
        test.read_file("fr.json")?,
        "{\n  \"errors\": {\n    \"file.missing\": \"[fr] File missing\"\n  }\n}\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_nested_reply_is_merged_under_flat_keys() -> Result<()> {
    let test = SyncTest::new()?;
    test.write_file("en.json", r#"{"nav": {"home": "Home", "about": "About"}}"#)?;
    test.write_file("fr.json", "{}")?;

    test.run(&FakeBackend::with_mode(Mode::Nested)).await?;

    let fr = test.read_flat("fr.json")?;
    assert_eq!(fr.keys().collect::<Vec<_>>(), vec!["nav.home", "nav.about"]);
    assert_eq!(fr["nav.home"], "[fr] Home");
    assert_eq!(fr["nav.about"], "[fr] About");

    Ok(())
}
