use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use icu_locid::{Locale, ParserError as LocaleParserError};
use lexiform_engine::{
    apply_replacements, choose_plural_form, is_pluralized, placeholders, Replacements,
};
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("failed to enumerate locale directory {0}: {1}")]
    ReadDir(PathBuf, io::Error),
    #[error("failed to read locale file {0}: {1}")]
    ReadFile(PathBuf, io::Error),
    #[error("failed to parse locale file {0}: {1}")]
    ParseFile(PathBuf, serde_json::Error),
    #[error("duplicate locale code {0}")]
    DuplicateLocale(String),
    #[error("locale {locale} message '{key}' is not a string")]
    NonStringValue { locale: String, key: String },
    #[error("locale identifier '{locale}' is invalid: {error}")]
    InvalidLocaleIdentifier {
        locale: String,
        error: LocaleParserError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCatalogStats {
    pub code: String,
    pub total_entries: usize,
    pub plural_entries: usize,
}

/// Placeholders used by the fallback template but not by a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMismatch {
    pub key: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct LocaleCatalog {
    entries: BTreeMap<String, String>,
}

/// Flat key → template catalogs for every loaded locale, with one fallback.
#[derive(Debug, Clone)]
pub struct LocalizationManager {
    catalogs: BTreeMap<String, LocaleCatalog>,
    active: String,
    fallback: String,
}

impl LocalizationManager {
    /// Constructs an empty manager whose active and fallback locale is `default_locale`.
    /// （以指定的預設語系建立空的語系管理器。）
    pub fn new(default_locale: &str) -> Self {
        Self {
            catalogs: BTreeMap::new(),
            active: default_locale.to_string(),
            fallback: default_locale.to_string(),
        }
    }

    /// Loads `<locale>.json` files from the provided directory.
    /// （從指定目錄載入語系檔。）
    pub fn load_from_dir(
        path: impl AsRef<Path>,
        default_locale: &str,
    ) -> Result<Self, LocalizationError> {
        Self::load_from_dirs(std::iter::once(path), default_locale)
    }

    /// Loads locale files from multiple directories in order.
    /// （依序從多個目錄載入語系檔。）
    pub fn load_from_dirs<I, P>(paths: I, default_locale: &str) -> Result<Self, LocalizationError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut manager = Self::new(default_locale);
        for path in paths {
            manager.load_directory(path.as_ref())?;
        }
        Ok(manager)
    }

    /// Adds an in-memory catalog for `code`.
    /// （加入記憶體中的語系資料。）
    pub fn insert_locale<I, K, V>(&mut self, code: &str, entries: I) -> Result<(), LocalizationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        validate_locale_code(code)?;
        if self.catalogs.contains_key(code) {
            return Err(LocalizationError::DuplicateLocale(code.to_string()));
        }
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.catalogs
            .insert(code.to_string(), LocaleCatalog { entries });
        Ok(())
    }

    /// Returns the locale code of the active language.
    /// （回傳目前啟用語系的代碼字串。）
    pub fn active_code(&self) -> &str {
        self.active.as_str()
    }

    /// Returns the locale code configured as fallback.
    /// （回傳用作回退的語系代碼。）
    pub fn fallback_code(&self) -> &str {
        self.fallback.as_str()
    }

    /// Loaded locale codes in sorted order.
    pub fn locale_codes(&self) -> Vec<&str> {
        self.catalogs.keys().map(String::as_str).collect()
    }

    /// Switches the active locale; returns `false` when `code` is not loaded.
    /// （依語系代碼切換目前啟用的語系。）
    pub fn set_active(&mut self, code: &str) -> bool {
        if self.catalogs.contains_key(code) {
            self.active = code.to_string();
            true
        } else {
            false
        }
    }

    /// Provides per-locale statistics useful for tooling.
    /// （回傳語系統計資訊，供工具使用。）
    pub fn catalog_stats(&self) -> Vec<LocaleCatalogStats> {
        self.catalogs
            .iter()
            .map(|(code, catalog)| LocaleCatalogStats {
                code: code.clone(),
                total_entries: catalog.entries.len(),
                plural_entries: catalog
                    .entries
                    .values()
                    .filter(|template| is_pluralized(template))
                    .count(),
            })
            .collect()
    }

    /// Returns keys the fallback locale defines but `code` does not.
    /// （比對預設語系，回傳指定語系缺少的鍵。）
    pub fn missing_keys(&self, code: &str) -> Option<Vec<String>> {
        let catalog = self.catalogs.get(code)?;
        let Some(fallback) = self.catalogs.get(&self.fallback) else {
            return Some(Vec::new());
        };
        Some(
            fallback
                .entries
                .keys()
                .filter(|key| !catalog.entries.contains_key(*key))
                .cloned()
                .collect(),
        )
    }

    /// Lists translations of `code` that drop placeholders the fallback template uses.
    pub fn placeholder_mismatches(&self, code: &str) -> Option<Vec<PlaceholderMismatch>> {
        let catalog = self.catalogs.get(code)?;
        let Some(fallback) = self.catalogs.get(&self.fallback) else {
            return Some(Vec::new());
        };
        let mut mismatches = Vec::new();
        for (key, reference) in &fallback.entries {
            let Some(translated) = catalog.entries.get(key) else {
                continue;
            };
            let used = lowercase_placeholders(translated);
            let missing: Vec<String> = lowercase_placeholders(reference)
                .into_iter()
                .filter(|name| !used.contains(name))
                .collect();
            if !missing.is_empty() {
                mismatches.push(PlaceholderMismatch {
                    key: key.clone(),
                    missing,
                });
            }
        }
        Some(mismatches)
    }

    /// Returns true if the specified locale provides the given key.
    /// （檢查指定語系是否存在特定鍵。）
    pub fn locale_has_key(&self, code: &str, key: &str) -> bool {
        self.catalogs
            .get(code)
            .is_some_and(|catalog| catalog.entries.contains_key(key))
    }

    /// Raw template for `key`, from the active locale or else the fallback.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.resolve(key).map(|(template, _)| template)
    }

    /// Retrieves a localized string with placeholders applied; unknown keys come back as-is.
    /// （取得在地化字串並套用替換值；找不到的鍵原樣回傳。）
    pub fn text<'a>(&'a self, key: &'a str, replacements: &Replacements) -> Cow<'a, str> {
        match self.template(key) {
            Some(template) => apply_replacements(template, replacements),
            None => Cow::Borrowed(key),
        }
    }

    /// Retrieves the plural form of `key` for `count`, then applies placeholders.
    ///
    /// The plural rule is the one of the locale the template was found in, so
    /// a key served from the fallback catalog is pluralized by fallback grammar.
    /// （依數量選擇複數形式並套用替換值。）
    pub fn choice(&self, key: &str, count: i64, replacements: &Replacements) -> String {
        match self.resolve(key) {
            Some((template, locale)) => {
                let chosen = choose_plural_form(template, count, locale);
                apply_replacements(&chosen, replacements).into_owned()
            }
            None => key.to_string(),
        }
    }

    fn resolve(&self, key: &str) -> Option<(&str, &str)> {
        [self.active.as_str(), self.fallback.as_str()]
            .into_iter()
            .find_map(|code| {
                self.catalogs
                    .get(code)
                    .and_then(|catalog| catalog.entries.get(key))
                    .map(|template| (template.as_str(), code))
            })
    }

    fn load_directory(&mut self, dir: &Path) -> Result<(), LocalizationError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("locale directory {} does not exist; skipping", dir.display());
                return Ok(());
            }
            Err(err) => return Err(LocalizationError::ReadDir(dir.to_path_buf(), err)),
        };

        for entry in entries {
            let entry = entry.map_err(|err| LocalizationError::ReadDir(dir.to_path_buf(), err))?;
            let path = entry.path();
            let metadata = entry
                .metadata()
                .map_err(|err| LocalizationError::ReadFile(path.clone(), err))?;
            if !metadata.is_file() {
                debug!("skipping {}: not a file", path.display());
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                debug!("skipping {}: not a .json file", path.display());
                continue;
            }
            let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!("skipping locale file with non UTF-8 name: {}", path.display());
                continue;
            };
            let code = code.to_string();
            validate_locale_code(&code)?;
            if self.catalogs.contains_key(&code) {
                return Err(LocalizationError::DuplicateLocale(code));
            }

            let templates = read_flat_file(&path, &code)?;
            debug!(
                "loaded locale {code} from {} ({} entries)",
                path.display(),
                templates.len()
            );
            self.catalogs.insert(
                code,
                LocaleCatalog {
                    entries: templates,
                },
            );
        }
        Ok(())
    }
}

fn read_flat_file(path: &Path, locale: &str) -> Result<BTreeMap<String, String>, LocalizationError> {
    let contents =
        fs::read_to_string(path).map_err(|err| LocalizationError::ReadFile(path.to_path_buf(), err))?;
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&contents)
        .map_err(|err| LocalizationError::ParseFile(path.to_path_buf(), err))?;
    raw.into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(template) => Ok((key, template)),
            _ => Err(LocalizationError::NonStringValue {
                locale: locale.to_string(),
                key,
            }),
        })
        .collect()
}

fn validate_locale_code(code: &str) -> Result<(), LocalizationError> {
    Locale::from_str(code)
        .map(|_| ())
        .map_err(|error| LocalizationError::InvalidLocaleIdentifier {
            locale: code.to_string(),
            error,
        })
}

fn lowercase_placeholders(template: &str) -> BTreeSet<String> {
    placeholders(template)
        .into_iter()
        .map(|name| name.to_lowercase())
        .collect()
}
