//! Internationalization (i18n) support
//!
//! Built-in strings for `pt-BR` and `en` ship with the binary; YAML or
//! JSON files in the site's language directory override them key by key.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

type Translations = HashMap<String, serde_yaml::Value>;

const BUILTIN: [(&str, &str); 2] = [
    ("pt-BR", include_str!("languages/pt-BR.yml")),
    ("en", include_str!("languages/en.yml")),
];

/// Internationalization handler
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, Translations>,
}

impl I18n {
    /// Create a handler for a language tag, preloaded with built-in strings
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, source) in BUILTIN {
            match serde_yaml::from_str::<Translations>(source) {
                Ok(data) => {
                    translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::warn!("Invalid built-in language {}: {}", lang, e),
            }
        }

        Self {
            language: normalize_language(language),
            translations,
        }
    }

    /// Load language files from a directory, overriding built-in keys
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml") | Some("json")) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let lang = normalize_language(stem);
            let content = fs::read_to_string(&path)?;

            // Skip invalid files
            let data: Option<Translations> = if ext == Some("json") {
                match serde_json::from_str::<serde_json::Value>(&content) {
                    Ok(json) => Some(convert_json_to_yaml(json)),
                    Err(e) => {
                        tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                        None
                    }
                }
            } else {
                match serde_yaml::from_str(&content) {
                    Ok(data) => Some(data),
                    Err(e) => {
                        tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                        None
                    }
                }
            };

            if let Some(data) = data {
                self.translations.entry(lang).or_default().extend(data);
                tracing::debug!("Loaded language file: {:?}", path);
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key, nested keys use dots ("posts_loaded.one")
    pub fn get(&self, key: &str) -> String {
        self.get_for_lang(&self.language, key)
    }

    /// Get a translation for a specific language
    pub fn get_for_lang(&self, lang: &str, key: &str) -> String {
        if let Some(lang_data) = self.translations.get(lang) {
            if let Some(value) = get_nested_value(lang_data, key) {
                return yaml_value_to_string(value);
            }
        }

        // Fallback to English
        if lang != "en" {
            if let Some(lang_data) = self.translations.get("en") {
                if let Some(value) = get_nested_value(lang_data, key) {
                    return yaml_value_to_string(value);
                }
            }
        }

        key.to_string()
    }

    /// Get a pluralized translation, `%d` is replaced with the count
    pub fn get_plural(&self, key: &str, count: usize) -> String {
        let plural_key = match count {
            0 => format!("{}.zero", key),
            1 => format!("{}.one", key),
            _ => format!("{}.other", key),
        };

        self.get(&plural_key).replace("%d", &count.to_string())
    }
}

/// Map tags like `pt_br` or `en-US` onto the built-in language names,
/// other tags onto their primary subtag
fn normalize_language(tag: &str) -> String {
    let lowered = tag.trim().to_lowercase().replace('_', "-");
    if lowered.is_empty() {
        return "en".to_string();
    }
    for (lang, _) in BUILTIN {
        if lang.to_lowercase() == lowered {
            return lang.to_string();
        }
    }
    // Otherwise match on the primary subtag ("pt-PT" -> "pt-BR", "de-DE" -> "de")
    let primary = lowered.split('-').next().unwrap_or_default();
    for (lang, _) in BUILTIN {
        if lang.to_lowercase().split('-').next() == Some(primary) {
            return lang.to_string();
        }
    }
    primary.to_string()
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Translations, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Convert JSON value to YAML HashMap
fn convert_json_to_yaml(json: serde_json::Value) -> Translations {
    let mut result = HashMap::new();

    if let serde_json::Value::Object(obj) = json {
        for (key, value) in obj {
            result.insert(key, json_value_to_yaml(value));
        }
    }

    result
}

fn json_value_to_yaml(json: serde_json::Value) -> serde_yaml::Value {
    match json {
        serde_json::Value::Null => serde_yaml::Value::Null,
        serde_json::Value::Bool(b) => serde_yaml::Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_yaml::Value::Number(i.into())
            } else if let Some(f) = n.as_f64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(f))
            } else {
                serde_yaml::Value::Null
            }
        }
        serde_json::Value::String(s) => serde_yaml::Value::String(s),
        serde_json::Value::Array(arr) => {
            serde_yaml::Value::Sequence(arr.into_iter().map(json_value_to_yaml).collect())
        }
        serde_json::Value::Object(obj) => {
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in obj {
                map.insert(serde_yaml::Value::String(k), json_value_to_yaml(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pt_br() {
        let i18n = I18n::new("pt_BR");
        assert_eq!(i18n.language(), "pt-BR");
        assert_eq!(i18n.get("load_more"), "Carregar mais posts");
        assert_eq!(i18n.get("all_loaded"), "Você já carregou todos os posts");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let i18n = I18n::new("de");
        assert_eq!(i18n.language(), "de");
        assert_eq!(i18n.get("load_more"), "Load more posts");
        assert_eq!(i18n.get("unknown"), "unknown");
    }

    #[test]
    fn test_regional_variant_uses_builtin_language() {
        assert_eq!(I18n::new("pt-PT").language(), "pt-BR");
        assert_eq!(I18n::new("en_GB").language(), "en");
    }

    #[test]
    fn test_site_language_file_for_other_language() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("de.yml"), "load_more: Mehr laden\n").unwrap();

        let mut i18n = I18n::new("de-DE");
        i18n.load_languages(dir.path()).unwrap();

        assert_eq!(i18n.get("load_more"), "Mehr laden");
        assert_eq!(i18n.get("all_loaded"), "You have loaded all posts");
    }

    #[test]
    fn test_plural() {
        let i18n = I18n::new("pt-BR");
        assert_eq!(i18n.get_plural("posts_loaded", 0), "Nenhum post carregado");
        assert_eq!(i18n.get_plural("posts_loaded", 1), "1 post carregado");
        assert_eq!(i18n.get_plural("posts_loaded", 7), "7 posts carregados");
    }

    #[test]
    fn test_language_files_override_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pt-BR.yml"), "load_more: Ver mais\n").unwrap();
        fs::write(dir.path().join("en.json"), r#"{"all_loaded": "That's all"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut i18n = I18n::new("pt-BR");
        i18n.load_languages(dir.path()).unwrap();

        assert_eq!(i18n.get("load_more"), "Ver mais");
        assert_eq!(i18n.get("all_loaded"), "Você já carregou todos os posts");
        assert_eq!(i18n.get_for_lang("en", "all_loaded"), "That's all");
        assert_eq!(i18n.get_for_lang("en", "load_more"), "Load more posts");
    }
}
