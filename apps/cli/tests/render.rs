use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn choose_prints_selected_form() -> Result<(), Box<dyn Error>> {
    cli()?
        .args(["choose", "article|articles", "--count", "0", "--locale", "fr"])
        .assert()
        .success()
        .stdout("article\n");

    cli()?
        .args(["choose", "яблоко|яблока|яблок", "-n", "22", "-l", "ru"])
        .assert()
        .success()
        .stdout("яблока\n");
    Ok(())
}

#[test]
fn apply_uses_set_pairs_and_values_file() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let values = temp.path().join("values.json");
    fs::write(&values, r#"{ "name": "john", "count": 3 }"#)?;

    cli()?
        .args([
            "apply",
            ":Name owns :count :thing",
            "--values",
            values.to_str().unwrap(),
            "--set",
            "count=4",
        ])
        .assert()
        .success()
        .stdout("John owns 4 :thing\n");
    Ok(())
}

#[test]
fn set_values_are_printed_as_typed() -> Result<(), Box<dyn Error>> {
    cli()?
        .args([
            "apply",
            "Agent :code calls :phone",
            "--set",
            "code=007",
            "--set",
            "phone=+15551234",
        ])
        .assert()
        .success()
        .stdout("Agent 007 calls +15551234\n");
    Ok(())
}

#[test]
fn translate_combines_both_steps() -> Result<(), Box<dyn Error>> {
    cli()?
        .args([
            "translate",
            "{0} :name has no apples|{1} :name has :count apple|[2,*] :name has :count apples",
            "--count",
            "5",
            "--set",
            "name=John",
            "--set",
            "count=5",
        ])
        .assert()
        .success()
        .stdout("John has 5 apples\n");
    Ok(())
}

#[test]
fn lookup_renders_catalog_entries() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    fs::write(
        temp.path().join("en.json"),
        r#"{ "cart.items": "{0} Your cart is empty|{1} One item|[2,*] :count items", "cart.title": "Cart of :user" }"#,
    )?;
    fs::write(
        temp.path().join("pl.json"),
        r#"{ "cart.items": ":count produkt|:count produkty|:count produktów" }"#,
    )?;
    let dir = temp.path().to_str().unwrap();

    cli()?
        .args(["lookup", "cart.items", "--dir", dir, "-l", "pl", "-n", "3", "--set", "count=3"])
        .assert()
        .success()
        .stdout("3 produkty\n");

    cli()?
        .args(["lookup", "cart.title", "--dir", dir, "-l", "pl", "--set", "user=ola"])
        .assert()
        .success()
        .stdout("Cart of ola\n");

    cli()?
        .args(["lookup", "cart.missing", "--dir", dir])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cart.missing"));
    Ok(())
}

#[test]
fn lookup_rejects_unknown_locale() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("en.json"), r#"{ "a": "b" }"#)?;

    cli()?
        .args(["lookup", "a", "--dir", temp.path().to_str().unwrap(), "-l", "de"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locale 'de' is not available"));
    Ok(())
}

#[test]
fn categories_lists_indices() -> Result<(), Box<dyn Error>> {
    cli()?
        .args(["categories", "--locale", "cs", "--from", "1", "--to", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CzechSlovak (3 form(s))"))
        .stdout(predicate::str::contains("1\t0\n2\t1\n3\t1\n4\t1\n5\t2\n"));
    Ok(())
}

fn cli() -> Result<Command, Box<dyn Error>> {
    Ok(Command::cargo_bin("lexiform-cli")?)
}
