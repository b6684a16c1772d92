use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lexiform_catalog::LocalizationManager;
use lexiform_engine::{
    apply_replacements, choose_plural_form, translate, PluralRule, ReplacementValue,
    Replacements, DEFAULT_LOCALE,
};
use log::debug;

#[derive(Parser)]
#[command(
    name = "lexiform-cli",
    about = "Render plural-aware translation templates",
    author,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 依數量選擇複數形式。 / Print the plural form of a template for a count.
    Choose(ChooseArgs),
    /// 套用預留位置替換值。 / Fill in `:placeholder` values of a template.
    Apply(ApplyArgs),
    /// 選擇複數形式後套用替換值。 / Choose the plural form, then fill in placeholders.
    Translate(TranslateArgs),
    /// 從語言包目錄渲染指定鍵。 / Render a key from a directory of locale files.
    Lookup(LookupArgs),
    /// 列出數量對應的複數索引。 / Print the plural form index for a range of counts.
    Categories(CategoriesArgs),
}

#[derive(Args)]
struct CountArgs {
    /// 用於選擇複數形式的數量。 / Count used to pick the plural form.
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    count: i64,
    /// 語系代碼，例如 en-US。 / Locale tag such as en-US.
    #[arg(long, short = 'l', default_value = DEFAULT_LOCALE)]
    locale: String,
}

#[derive(Args)]
struct ReplacementArgs {
    /// 以 key=value 指定文字替換值，可重複。 / Placeholder text as key=value, kept as typed; repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_replacement)]
    set: Vec<(String, ReplacementValue)>,
    /// 包含替換值的 JSON 物件檔案。 / JSON object file with placeholder values.
    #[arg(long, value_name = "FILE")]
    values: Option<PathBuf>,
}

#[derive(Args)]
struct ChooseArgs {
    /// 以 | 分隔的範本。 / Pipe-delimited template.
    template: String,
    #[command(flatten)]
    count: CountArgs,
}

#[derive(Args)]
struct ApplyArgs {
    /// 含有 :placeholder 的範本。 / Template containing :placeholders.
    template: String,
    #[command(flatten)]
    replacements: ReplacementArgs,
}

#[derive(Args)]
struct TranslateArgs {
    /// 以 | 分隔的範本。 / Pipe-delimited template.
    template: String,
    #[command(flatten)]
    count: CountArgs,
    #[command(flatten)]
    replacements: ReplacementArgs,
}

#[derive(Args)]
struct LookupArgs {
    /// 要渲染的訊息鍵。 / Message key to render.
    key: String,
    /// 語言包資料夾路徑。 / Directory that contains `<locale>.json` files.
    #[arg(long, value_name = "DIR", default_value = "lang")]
    dir: PathBuf,
    /// 要使用的語系；預設為回退語系。 / Locale to render in (defaults to the fallback locale).
    #[arg(long, short = 'l')]
    locale: Option<String>,
    /// 預設回退語系代碼。 / Default fallback locale code.
    #[arg(long, default_value = DEFAULT_LOCALE)]
    default_locale: String,
    /// 若提供則選擇複數形式。 / Pick a plural form for this count when given.
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    count: Option<i64>,
    #[command(flatten)]
    replacements: ReplacementArgs,
}

#[derive(Args)]
struct CategoriesArgs {
    /// 語系代碼。 / Locale tag.
    #[arg(long, short = 'l', default_value = DEFAULT_LOCALE)]
    locale: String,
    /// 起始數量（含）。 / First count (inclusive).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    from: i64,
    /// 結束數量（含）。 / Last count (inclusive).
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    to: i64,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn run() -> Result<()> {
    let Cli { command } = Cli::parse();
    match command {
        Commands::Choose(args) => {
            println!(
                "{}",
                choose_plural_form(&args.template, args.count.count, &args.count.locale)
            );
            Ok(())
        }
        Commands::Apply(args) => {
            let replacements = collect_replacements(args.replacements)?;
            println!("{}", apply_replacements(&args.template, &replacements));
            Ok(())
        }
        Commands::Translate(args) => {
            let replacements = collect_replacements(args.replacements)?;
            println!(
                "{}",
                translate(
                    &args.template,
                    args.count.count,
                    &args.count.locale,
                    &replacements
                )
            );
            Ok(())
        }
        Commands::Lookup(args) => execute_lookup(args),
        Commands::Categories(args) => execute_categories(args),
    }
}

fn execute_lookup(args: LookupArgs) -> Result<()> {
    let replacements = collect_replacements(args.replacements)?;
    let mut manager = LocalizationManager::load_from_dir(&args.dir, &args.default_locale)
        .with_context(|| format!("load localization files from {}", args.dir.display()))?;
    if let Some(locale) = args.locale.as_deref() {
        if !manager.set_active(locale) {
            bail!(
                "locale '{}' is not available in {}",
                locale,
                args.dir.display()
            );
        }
    }
    if manager.template(&args.key).is_none() {
        bail!(
            "key '{}' is not defined for locale '{}' or fallback '{}'",
            args.key,
            manager.active_code(),
            manager.fallback_code()
        );
    }
    debug!("rendering '{}' in {}", args.key, manager.active_code());
    let rendered = match args.count {
        Some(count) => manager.choice(&args.key, count, &replacements),
        None => manager.text(&args.key, &replacements).into_owned(),
    };
    println!("{rendered}");
    Ok(())
}

fn execute_categories(args: CategoriesArgs) -> Result<()> {
    if args.from > args.to {
        bail!("--from ({}) must not exceed --to ({})", args.from, args.to);
    }
    let rule = PluralRule::for_locale(&args.locale);
    println!(
        "{} uses {:?} ({} form(s))",
        args.locale,
        rule,
        rule.form_count()
    );
    for count in args.from..=args.to {
        println!("{count}\t{}", rule.index(count));
    }
    Ok(())
}

fn collect_replacements(args: ReplacementArgs) -> Result<Replacements> {
    let mut replacements = match args.values.as_deref() {
        Some(path) => read_values_file(path)?,
        None => Replacements::new(),
    };
    for (key, value) in args.set {
        replacements.insert(key, value);
    }
    Ok(replacements)
}

fn read_values_file(path: &Path) -> Result<Replacements> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse replacement values {}", path.display()))
}

fn parse_replacement(raw: &str) -> Result<(String, ReplacementValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), ReplacementValue::Text(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(key: &str, value: &str) -> Result<(String, ReplacementValue), String> {
        Ok((key.to_string(), ReplacementValue::Text(value.to_string())))
    }

    #[test]
    fn replacement_pairs_split_on_first_equals() {
        assert_eq!(parse_replacement("count=5"), text("count", "5"));
        assert_eq!(parse_replacement("eq=a=b"), text("eq", "a=b"));
        assert_eq!(parse_replacement(" name =Ann"), text("name", "Ann"));
        assert_eq!(parse_replacement("empty="), text("empty", ""));
        assert!(parse_replacement("novalue").is_err());
        assert!(parse_replacement("=x").is_err());
    }

    #[test]
    fn set_values_keep_their_spelling() {
        for raw in ["007", "+15551234", "1e3", "1.50", "-0.5", "inf"] {
            assert_eq!(parse_replacement(&format!("v={raw}")), text("v", raw));
        }
    }
}
