//! BM25 search over tabular reference rows.
//!
//! Rows arrive already loaded as column maps; this module only joins the
//! searchable columns into documents, ranks them, and projects the winners
//! back onto the requested output columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bm25::{known_terms, Bm25Config, Corpus};

/// One reference row keyed by column name.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowHit {
    /// Index of the row in the input slice.
    pub index: usize,
    pub score: f64,
    /// Output columns present in the row, in requested order.
    pub columns: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowSearchResult {
    pub hits: Vec<RowHit>,
    /// Query terms that occur somewhere in the searched columns.
    pub matched_terms: Vec<String>,
}

/// Column projection and result limit for one table.
#[derive(Debug, Clone)]
pub struct RowSearch<'a> {
    search_columns: &'a [String],
    output_columns: &'a [String],
    max_results: usize,
    bm25: Bm25Config,
}

impl<'a> RowSearch<'a> {
    #[must_use]
    pub fn new(search_columns: &'a [String], output_columns: &'a [String]) -> Self {
        Self {
            search_columns,
            output_columns,
            max_results: 3,
            bm25: Bm25Config::default(),
        }
    }

    #[must_use]
    pub const fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub const fn bm25(mut self, cfg: Bm25Config) -> Self {
        self.bm25 = cfg;
        self
    }

    /// Rank rows and keep the top `max_results` entries that scored above zero.
    #[must_use]
    pub fn search(&self, rows: &[Row], query: &str) -> RowSearchResult {
        let documents: Vec<String> = rows.iter().map(|row| self.document(row)).collect();
        let corpus = Corpus::fit_with(self.bm25, &documents);

        let hits = corpus
            .score(query)
            .into_iter()
            .take(self.max_results)
            .filter(|(_, score)| *score > 0.0)
            .filter_map(|(index, score)| {
                rows.get(index).map(|row| RowHit {
                    index,
                    score,
                    columns: self.project(row),
                })
            })
            .collect();

        RowSearchResult {
            hits,
            matched_terms: known_terms(&corpus, query),
        }
    }

    fn document(&self, row: &Row) -> String {
        self.search_columns
            .iter()
            .map(|col| row.get(col).map_or("", String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn project(&self, row: &Row) -> Vec<(String, String)> {
        self.output_columns
            .iter()
            .filter_map(|col| row.get(col).map(|value| (col.clone(), value.clone())))
            .collect()
    }
}

/// One-shot [`RowSearch`] with default BM25 parameters.
#[must_use]
pub fn search_rows(
    rows: &[Row],
    search_columns: &[String],
    output_columns: &[String],
    query: &str,
    max_results: usize,
) -> RowSearchResult {
    RowSearch::new(search_columns, output_columns)
        .max_results(max_results)
        .search(rows, query)
}

/// Pick the domain whose keywords occur most often (as substrings) in the
/// lowercased query. Earlier domains win ties; no hits at all means `default`.
#[must_use]
pub fn detect_domain<'d>(
    query: &str,
    domains: &'d [(String, Vec<String>)],
    default: &'d str,
) -> &'d str {
    let query = query.to_lowercase();
    let mut best: Option<(&str, usize)> = None;
    for (domain, keywords) in domains {
        let hits = keywords
            .iter()
            .filter(|kw| query.contains(&kw.to_lowercase()))
            .count();
        if best.map_or(true, |(_, top)| hits > top) {
            best = Some((domain.as_str(), hits));
        }
    }

    match best {
        Some((domain, hits)) if hits > 0 => domain,
        _ => default,
    }
}
