use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::query_expansion::{Synonym, SynonymExpander};

const BUILTIN_CATEGORIES: &str = include_str!("../../../profiles/categories.json");

/// One numbered step of a category guide: what to do, and the command for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideStep {
    pub label: String,
    pub command: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub title: String,
    pub steps: Vec<GuideStep>,
    pub tip: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub keywords: Vec<String>,
    pub guide: Option<Guide>,
}

impl Category {
    pub fn new<I, S>(key: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            guide: None,
        }
    }

    #[must_use]
    pub fn with_guide(mut self, guide: Guide) -> Self {
        self.guide = Some(guide);
        self
    }
}

/// The immutable category/keyword/guide table injected into the classifier
/// and scorer. Category order is the tie order for equal scores.
#[derive(Clone, Debug)]
pub struct CategoryTable {
    categories: Vec<Category>,
    synonyms: Vec<Synonym>,
    expander: SynonymExpander,
    /// Whole-word pattern per single-word keyword.
    keyword_patterns: HashMap<String, Regex>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawTable {
    schema_version: Option<u32>,
    #[serde(default)]
    synonyms: Vec<Synonym>,
    #[serde(default)]
    categories: Vec<RawCategory>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawCategory {
    key: String,
    #[serde(default)]
    keywords: Vec<String>,
    guide: Option<RawGuide>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawGuide {
    title: String,
    #[serde(default)]
    steps: Vec<(String, String)>,
    tip: Option<String>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>, synonyms: Vec<Synonym>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(categories.len());
        for mut category in categories {
            let key = category.key.trim().to_string();
            if key.is_empty() {
                return Err(SearchError::invalid_table("category key must not be empty"));
            }
            if !seen.insert(key.to_lowercase()) {
                return Err(SearchError::invalid_table(format!(
                    "duplicate category key '{key}'"
                )));
            }
            category.key = key;
            category.keywords = category
                .keywords
                .iter()
                .map(|kw| kw.trim().to_lowercase())
                .filter(|kw| !kw.is_empty())
                .collect();
            normalized.push(category);
        }

        let mut keyword_patterns = HashMap::new();
        for keyword in normalized.iter().flat_map(|c| c.keywords.iter()) {
            if keyword.contains(' ') || keyword_patterns.contains_key(keyword) {
                continue;
            }
            let pattern = format!(r"\b{}\b", regex::escape(keyword));
            let regex = Regex::new(&pattern).map_err(|err| {
                SearchError::invalid_table(format!("keyword '{keyword}': {err}"))
            })?;
            keyword_patterns.insert(keyword.clone(), regex);
        }

        let expander = SynonymExpander::new(&synonyms)?;
        Ok(Self {
            categories: normalized,
            synonyms,
            expander,
            keyword_patterns,
        })
    }

    /// A table with no categories: every task scores empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            synonyms: Vec::new(),
            expander: SynonymExpander::empty(),
            keyword_patterns: HashMap::new(),
        }
    }

    /// The bundled table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_bytes(BUILTIN_CATEGORIES.as_bytes()).expect("bundled category table must parse")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| SearchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a JSON table, falling back to TOML.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = parse_value(bytes)?;
        validate_table_value(&value)?;
        let raw: RawTable =
            serde_json::from_value(value).map_err(|err| SearchError::Parse(err.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTable) -> Result<Self> {
        if let Some(version) = raw.schema_version {
            if version != 1 {
                return Err(SearchError::UnsupportedSchema(version));
            }
        }

        let categories = raw
            .categories
            .into_iter()
            .map(|c| Category {
                key: c.key,
                keywords: c.keywords,
                guide: c.guide.map(|g| Guide {
                    title: g.title,
                    steps: g
                        .steps
                        .into_iter()
                        .map(|(label, command)| GuideStep { label, command })
                        .collect(),
                    tip: g.tip.filter(|t| !t.trim().is_empty()),
                }),
            })
            .collect();

        Self::new(categories, raw.synonyms)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }

    /// Case-insensitive lookup by key.
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&Category> {
        let key = key.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.key.to_lowercase() == key)
    }

    #[must_use]
    pub fn guide(&self, key: &str) -> Option<&Guide> {
        self.category(key).and_then(|c| c.guide.as_ref())
    }

    #[must_use]
    pub fn synonyms(&self) -> &[Synonym] {
        &self.synonyms
    }

    #[must_use]
    pub const fn expander(&self) -> &SynonymExpander {
        &self.expander
    }

    /// Whole-word pattern for a single-word keyword of this table.
    pub(crate) fn keyword_pattern(&self, keyword: &str) -> Option<&Regex> {
        self.keyword_patterns.get(keyword)
    }

    /// Single-word trigger keywords across all categories, in table order.
    pub fn single_word_keywords(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.keywords.iter())
            .map(String::as_str)
            .filter(|kw| !kw.contains(' '))
    }
}

fn parse_value(bytes: &[u8]) -> Result<serde_json::Value> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes)
                .map_err(|err| SearchError::Parse(format!("{json_err}; {err}")))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                SearchError::Parse(format!("{json_err}; TOML parse error: {toml_err}"))
            })?;
            serde_json::to_value(toml_value).map_err(|err| SearchError::Parse(err.to_string()))
        }
    }
}

fn validate_table_value(value: &serde_json::Value) -> Result<()> {
    fn validate_object_keys(
        unknown: &mut Vec<String>,
        obj: &serde_json::Map<String, serde_json::Value>,
        base: &str,
        allowed: &[&str],
    ) {
        for key in obj.keys() {
            if !allowed.iter().any(|a| a == &key.as_str()) {
                if base.is_empty() {
                    unknown.push(key.to_string());
                } else {
                    unknown.push(format!("{base}.{key}"));
                }
            }
        }
    }

    let serde_json::Value::Object(root) = value else {
        return Err(SearchError::Parse(
            "category table must be an object".to_string(),
        ));
    };

    let mut unknown = Vec::new();
    validate_object_keys(
        &mut unknown,
        root,
        "",
        &["schema_version", "synonyms", "categories"],
    );

    if let Some(serde_json::Value::Array(synonyms)) = root.get("synonyms") {
        for (idx, synonym) in synonyms.iter().enumerate() {
            if let serde_json::Value::Object(obj) = synonym {
                validate_object_keys(
                    &mut unknown,
                    obj,
                    &format!("synonyms[{idx}]"),
                    &["term", "canonical"],
                );
            }
        }
    }

    if let Some(serde_json::Value::Array(categories)) = root.get("categories") {
        for (idx, category) in categories.iter().enumerate() {
            let serde_json::Value::Object(obj) = category else {
                continue;
            };
            let base = format!("categories[{idx}]");
            validate_object_keys(&mut unknown, obj, &base, &["key", "keywords", "guide"]);
            if let Some(serde_json::Value::Object(guide)) = obj.get("guide") {
                validate_object_keys(
                    &mut unknown,
                    guide,
                    &format!("{base}.guide"),
                    &["title", "steps", "tip"],
                );
            }
        }
    }

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(SearchError::UnknownKeys(unknown))
    }
}
