use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN: [(&str, &str); 2] = [
    ("en", include_str!("../translations/en.json")),
    ("ru", include_str!("../translations/ru.json")),
];

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid translation file {name}: {source}")]
    Parse { name: String, source: serde_json::Error },
}

/// Flat `key -> text` tables per language.
#[derive(Debug, Clone)]
pub struct TranslationManager {
    default_language: String,
    tables: HashMap<String, HashMap<String, String>>,
}

impl TranslationManager {
    /// Built-in tables only.
    pub fn with_defaults(default_language: &str) -> Result<Self, TranslationError> {
        let mut manager = Self {
            default_language: normalize(default_language),
            tables: HashMap::new(),
        };
        for (lang, raw) in BUILTIN {
            manager.merge(lang, raw, &format!("builtin {}.json", lang))?;
        }
        Ok(manager)
    }

    /// Built-in tables, overridden by `<lang>.json` files from `dir` when it exists.
    pub fn load(dir: &Path, default_language: &str) -> Result<Self, TranslationError> {
        let mut manager = Self::with_defaults(default_language)?;
        if !dir.is_dir() {
            log::info!("Translations directory {:?} not found, using built-in texts", dir);
            return Ok(manager);
        }

        let io_err = |source: std::io::Error| TranslationError::Io { path: dir.to_path_buf(), source };
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()).map(normalize) else {
                continue;
            };
            let raw = fs::read_to_string(&path)
                .map_err(|source| TranslationError::Io { path: path.clone(), source })?;
            manager.merge(&lang, &raw, &path.display().to_string())?;
            log::info!("Loaded translations for '{}' from {:?}", lang, path);
        }
        Ok(manager)
    }

    fn merge(&mut self, lang: &str, raw: &str, name: &str) -> Result<(), TranslationError> {
        let table: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|source| TranslationError::Parse { name: name.to_string(), source })?;
        self.tables.entry(lang.to_string()).or_default().extend(table);
        Ok(())
    }

    /// Requested language, then the default language, then the key itself.
    pub fn get_text(&self, language: &str, key: &str) -> String {
        [normalize(language), self.default_language.clone()]
            .iter()
            .find_map(|lang| self.tables.get(lang).and_then(|t| t.get(key)))
            .cloned()
            .unwrap_or_else(|| {
                log::warn!("Missing translation for key '{}'", key);
                key.to_string()
            })
    }
}

/// `en-US` and `en_us` both become `en`.
fn normalize(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
