//! `ht-search`: BM25 lookup over domain reference tables.
//!
//! The config names each domain, the file holding its rows, which columns
//! are searched and which are shown. Row files are CSV with a header line,
//! or JSON arrays of objects.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as AnyhowContext, Result};
use htkit_protocol::{
    MultiTableSearchResponse, TableColumn, TableRow, TableSearchResponse, RESPONSE_SCHEMA_VERSION,
};
use htkit_search::{detect_domain, Row, RowSearch};
use serde::Deserialize;
use serde_json::Value;

const fn default_max_results() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    pub default_domain: String,
    pub domains: Vec<DomainConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    pub name: String,
    /// Row file; relative paths resolve against the config's directory.
    pub file: PathBuf,
    pub search_columns: Vec<String>,
    pub output_columns: Vec<String>,
    /// Substrings that steer auto-detection toward this domain.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Limit for this domain when every domain is searched at once.
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl TableSearchConfig {
    /// Load a JSON or TOML config. `.toml` files are read as TOML, anything
    /// else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read table config {}", path.display()))?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let mut config: Self = if is_toml {
            toml::from_str(&raw)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        };

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for domain in &mut config.domains {
            if domain.file.is_relative() {
                domain.file = base.join(&domain.file);
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            bail!("Table config declares no domains");
        }
        for (idx, domain) in self.domains.iter().enumerate() {
            if self.domains[..idx].iter().any(|d| d.name == domain.name) {
                bail!("Duplicate domain '{}'", domain.name);
            }
            if domain.search_columns.is_empty() {
                bail!("Domain '{}' has no search columns", domain.name);
            }
        }
        if self.domain(&self.default_domain).is_none() {
            bail!("Default domain '{}' is not declared", self.default_domain);
        }
        Ok(())
    }

    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&DomainConfig> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Explicit domain if known, otherwise keyword detection over `query`.
    /// An unknown explicit domain falls back to the default one.
    pub fn resolve_domain(&self, query: &str, requested: Option<&str>) -> Result<&DomainConfig> {
        let name = match requested {
            Some(name) if self.domain(name).is_some() => name,
            Some(name) => {
                log::warn!("Unknown domain '{name}', using '{}'", self.default_domain);
                self.default_domain.as_str()
            }
            None => {
                let keywords: Vec<(String, Vec<String>)> = self
                    .domains
                    .iter()
                    .map(|d| (d.name.clone(), d.keywords.clone()))
                    .collect();
                let detected = detect_domain(query, &keywords, &self.default_domain);
                self.domain(detected)
                    .map_or(self.default_domain.as_str(), |d| d.name.as_str())
            }
        };
        log::debug!("Searching domain '{name}'");
        self.domain(name)
            .with_context(|| format!("Domain '{name}' is not declared in the table config"))
    }
}

/// Read a row file. `.csv` files need a header line; anything else must be
/// a JSON array of objects.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv_rows(path)
    } else {
        load_json_rows(path)
    }
}

/// Short records keep only the columns they have; extra fields are dropped.
fn load_csv_rows(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to read rows from {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Missing CSV header in {}", path.display()))?
        .clone();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Bad CSV record {idx} in {}", path.display()))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

/// Strings are kept, `null` becomes empty and other scalars are rendered as
/// JSON text.
fn load_json_rows(path: &Path) -> Result<Vec<Row>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows from {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    let Value::Array(items) = value else {
        bail!("{} must contain a JSON array of rows", path.display());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, cell_text(value)))
                .collect()),
            _ => bail!("Row {idx} in {} is not an object", path.display()),
        })
        .collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn search_domain(domain: &DomainConfig, query: &str, limit: usize) -> Result<TableSearchResponse> {
    let rows = load_rows(&domain.file)?;
    let result = RowSearch::new(&domain.search_columns, &domain.output_columns)
        .max_results(limit)
        .search(&rows, query);
    log::debug!(
        "{} of {} rows matched in '{}'",
        result.hits.len(),
        rows.len(),
        domain.name
    );

    let results: Vec<TableRow> = result
        .hits
        .into_iter()
        .map(|hit| TableRow {
            score: hit.score,
            columns: hit
                .columns
                .into_iter()
                .map(|(name, value)| TableColumn { name, value })
                .collect(),
        })
        .collect();

    Ok(TableSearchResponse {
        schema_version: RESPONSE_SCHEMA_VERSION,
        domain: domain.name.clone(),
        query: query.to_string(),
        file: domain
            .file
            .file_name()
            .map_or_else(|| domain.file.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            }),
        count: results.len(),
        matched_terms: result.matched_terms,
        results,
    })
}

/// Run one query against a single domain.
pub fn run_table_search(
    config: &TableSearchConfig,
    query: &str,
    domain: Option<&str>,
    max_results: Option<usize>,
) -> Result<TableSearchResponse> {
    let domain = config.resolve_domain(query, domain)?;
    search_domain(domain, query, max_results.unwrap_or(config.max_results))
}

/// Run one query against every domain in config order. Each domain uses
/// `max_results` if given, else its own limit, else the config default.
pub fn run_table_search_all(
    config: &TableSearchConfig,
    query: &str,
    max_results: Option<usize>,
) -> Result<MultiTableSearchResponse> {
    let domains = config
        .domains
        .iter()
        .map(|domain| {
            let limit = max_results
                .or(domain.max_results)
                .unwrap_or(config.max_results);
            search_domain(domain, query, limit)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MultiTableSearchResponse {
        schema_version: RESPONSE_SCHEMA_VERSION,
        query: query.to_string(),
        total: domains.iter().map(|d| d.count).sum(),
        domains,
    })
}
