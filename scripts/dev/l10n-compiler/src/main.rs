use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lexiform_catalog::LocalizationManager;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(
    name = "l10n-compiler",
    about = "Validates flat locale packs against the fallback locale",
    version
)]
struct Args {
    /// 語言包資料夾路徑；預設為 lang。 / Directory that contains `<locale>.json` files (defaults to lang).
    #[arg(value_name = "DIR", default_value = "lang")]
    directory: PathBuf,
    /// 預設回退語系代碼。 / Default fallback locale code.
    #[arg(long, default_value = "en")]
    default_locale: String,
    /// 遇到缺少鍵或預留位置時使程序失敗。 / Fail when locales miss keys or placeholders relative to fallback.
    #[arg(long)]
    fail_on_missing: bool,
    /// 必要鍵清單（JSON）；檢查每個語系的翻譯覆蓋率。 / JSON list of keys every locale should translate.
    #[arg(long = "keys", value_name = "FILE")]
    key_list: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
    if let Err(err) = run() {
        eprintln!("l10n-compiler error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let manager = LocalizationManager::load_from_dir(&args.directory, &args.default_locale)
        .with_context(|| format!("load localization files from {}", args.directory.display()))?;

    let fallback = manager.fallback_code().to_string();
    if !manager.locale_codes().contains(&fallback.as_str()) {
        bail!(
            "fallback locale '{}' has no file in {}",
            fallback,
            args.directory.display()
        );
    }
    println!(
        "Loaded {} locale(s); fallback locale: {}",
        manager.locale_codes().len(),
        fallback
    );

    let mut total_findings = 0usize;
    for stats in manager.catalog_stats() {
        let mut line = format!(
            " - {}: {} strings ({} plural)",
            stats.code, stats.total_entries, stats.plural_entries
        );
        if stats.code == fallback {
            line.push_str(" [fallback]");
            println!("{line}");
            continue;
        }

        let missing = manager.missing_keys(&stats.code).unwrap_or_default();
        let mismatches = manager
            .placeholder_mismatches(&stats.code)
            .unwrap_or_default();
        if !missing.is_empty() {
            line.push_str(&format!(" — missing {} key(s)", missing.len()));
        }
        if !mismatches.is_empty() {
            line.push_str(&format!(
                " — {} placeholder mismatch(es)",
                mismatches.len()
            ));
        }
        println!("{line}");
        for key in missing.iter().take(5) {
            println!("     · {key}");
        }
        if missing.len() > 5 {
            println!("     · ... {} more", missing.len() - 5);
        }
        for mismatch in mismatches.iter() {
            let names: Vec<String> = mismatch
                .missing
                .iter()
                .map(|name| format!(":{name}"))
                .collect();
            println!("     · {} drops {}", mismatch.key, names.join(", "));
        }
        total_findings += missing.len() + mismatches.len();
    }

    if total_findings > 0 {
        eprintln!(
            "Found {total_findings} localization issue(s) relative to fallback '{}'",
            fallback
        );
        if args.fail_on_missing {
            bail!("missing localization keys or placeholders detected");
        }
    }

    if let Some(path) = args.key_list.as_ref() {
        check_key_list(&manager, path)?;
    }

    Ok(())
}

/// Keys an application expects to find, loaded from `--keys`.
#[derive(Debug, Deserialize)]
struct KeyList {
    /// Where the list was generated from; only echoed back.
    #[serde(default)]
    source: Option<String>,
    /// Locale that must define every key. Defaults to the fallback.
    #[serde(default)]
    locale: Option<String>,
    keys: Vec<String>,
}

fn check_key_list(manager: &LocalizationManager, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read key list {}", path.display()))?;
    let list: KeyList = serde_json::from_str(&contents)
        .with_context(|| format!("parse key list {}", path.display()))?;
    let required = list
        .locale
        .clone()
        .unwrap_or_else(|| manager.fallback_code().to_string());
    if !manager.locale_codes().contains(&required.as_str()) {
        bail!("key list {} requires locale '{}', which is not loaded", path.display(), required);
    }

    let label = list
        .source
        .clone()
        .unwrap_or_else(|| path.display().to_string());
    println!("Checking {} key(s) from {label}; required locale: {required}", list.keys.len());

    for code in manager.locale_codes() {
        if code == required {
            continue;
        }
        let untranslated = undefined_keys(manager, code, &list.keys);
        if untranslated.is_empty() {
            continue;
        }
        println!(
            " - {code}: {} of {} listed key(s) untranslated",
            untranslated.len(),
            list.keys.len()
        );
        for key in untranslated {
            println!("     · {key}");
        }
    }

    let undefined = undefined_keys(manager, &required, &list.keys);
    if undefined.is_empty() {
        println!("All listed keys are defined in '{required}'");
        return Ok(());
    }
    eprintln!(
        "{} listed key(s) undefined in required locale '{}':",
        undefined.len(),
        required
    );
    for key in &undefined {
        eprintln!("  · {key}");
    }
    bail!("key list {} is not covered by '{}'", path.display(), required);
}

fn undefined_keys<'a>(manager: &LocalizationManager, code: &str, keys: &'a [String]) -> Vec<&'a str> {
    keys.iter()
        .map(String::as_str)
        .filter(|key| !manager.locale_has_key(code, key))
        .collect()
}
