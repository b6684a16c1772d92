use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_pack(dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::write(
        dir.join("en.json"),
        r#"{ "inbox.count": "{0} No mail|[1,*] :count mails", "inbox.title": "Inbox of :name" }"#,
    )?;
    fs::write(
        dir.join("de.json"),
        r#"{ "inbox.count": "{0} Keine Post|[1,*] :count Nachrichten" }"#,
    )?;
    fs::write(
        dir.join("ja.json"),
        r#"{ "inbox.count": "メール", "inbox.title": "受信箱" }"#,
    )?;
    Ok(())
}

#[test]
fn reports_missing_keys_and_placeholders() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    write_pack(temp.path())?;

    Command::cargo_bin("l10n-compiler")?
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 locale(s); fallback locale: en"))
        .stdout(predicate::str::contains(" - en: 2 strings (1 plural) [fallback]"))
        .stdout(predicate::str::contains("     · inbox.title\n"))
        .stdout(predicate::str::contains("inbox.count drops :count"))
        .stdout(predicate::str::contains("inbox.title drops :name"))
        .stderr(predicate::str::contains("Found 3 localization issue(s)"));
    Ok(())
}

#[test]
fn fail_on_missing_sets_exit_status() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    write_pack(temp.path())?;

    Command::cargo_bin("l10n-compiler")?
        .arg(temp.path())
        .arg("--fail-on-missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("l10n-compiler error"));
    Ok(())
}

fn write_key_list(dir: &Path, contents: &str) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let path = dir.join("keys.list");
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn key_list_requires_named_locale() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    write_pack(temp.path())?;
    let list = write_key_list(
        temp.path(),
        r#"{ "locale": "de", "keys": ["inbox.count", "inbox.title"] }"#,
    )?;

    Command::cargo_bin("l10n-compiler")?
        .arg(temp.path())
        .arg("--keys")
        .arg(&list)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "1 listed key(s) undefined in required locale 'de':\n  · inbox.title",
        ))
        .stderr(predicate::str::contains("is not covered by 'de'"));
    Ok(())
}

#[test]
fn key_list_reports_untranslated_keys_per_locale() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    write_pack(temp.path())?;
    let list = write_key_list(
        temp.path(),
        r#"{ "source": "app.rs", "keys": ["inbox.count", "inbox.title"] }"#,
    )?;

    Command::cargo_bin("l10n-compiler")?
        .arg(temp.path())
        .arg("--keys")
        .arg(&list)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Checking 2 key(s) from app.rs; required locale: en",
        ))
        .stdout(predicate::str::contains(
            " - de: 1 of 2 listed key(s) untranslated\n     · inbox.title",
        ))
        .stdout(predicate::str::contains(" - ja:").not())
        .stdout(predicate::str::contains("All listed keys are defined in 'en'"));
    Ok(())
}

#[test]
fn key_list_locale_must_be_loaded() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    write_pack(temp.path())?;
    let list = write_key_list(temp.path(), r#"{ "locale": "fr", "keys": ["inbox.count"] }"#)?;

    Command::cargo_bin("l10n-compiler")?
        .arg(temp.path())
        .arg("--keys")
        .arg(&list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires locale 'fr', which is not loaded"));
    Ok(())
}

#[test]
fn fallback_file_is_required() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("fr.json"), r#"{ "a": "b" }"#)?;

    Command::cargo_bin("l10n-compiler")?
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("fallback locale 'en' has no file"));
    Ok(())
}
