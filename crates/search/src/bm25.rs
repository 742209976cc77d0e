use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bm25Config {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization.
    pub b: f64,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

#[derive(Clone, Debug)]
struct Document {
    len: usize,
    term_freq: HashMap<String, usize>,
}

impl Document {
    fn from_tokens(tokens: Vec<String>) -> Self {
        let len = tokens.len();
        let mut term_freq = HashMap::new();
        for token in tokens {
            *term_freq.entry(token).or_insert(0) += 1;
        }
        Self { len, term_freq }
    }
}

/// Term statistics for one in-memory document set.
///
/// Built fresh per search and never updated; an empty corpus scores nothing.
#[derive(Clone, Debug)]
pub struct Corpus {
    cfg: Bm25Config,
    docs: Vec<Document>,
    avg_len: f64,
    doc_freq: HashMap<String, usize>,
    idf: HashMap<String, f64>,
}

impl Corpus {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        Self::fit_with(Bm25Config::default(), documents)
    }

    pub fn fit_with<S: AsRef<str>>(cfg: Bm25Config, documents: &[S]) -> Self {
        let docs: Vec<Document> = documents
            .iter()
            .map(|doc| Document::from_tokens(tokenize(doc.as_ref())))
            .collect();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in &docs {
            for term in doc.term_freq.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let total_docs = docs.len() as f64;
        let avg_len = if docs.is_empty() {
            0.0
        } else {
            docs.iter().map(|d| d.len).sum::<usize>() as f64 / total_docs
        };
        let idf = doc_freq
            .iter()
            .map(|(term, df)| (term.clone(), bm25_idf(total_docs, *df as f64)))
            .collect();

        log::debug!(
            "bm25 corpus: {} docs, {} terms, avgdl {avg_len:.2}",
            docs.len(),
            doc_freq.len()
        );

        Self {
            cfg,
            docs,
            avg_len,
            doc_freq,
            idf,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    #[must_use]
    pub const fn avg_len(&self) -> f64 {
        self.avg_len
    }

    #[must_use]
    pub fn doc_len(&self, idx: usize) -> Option<usize> {
        self.docs.get(idx).map(|d| d.len)
    }

    #[must_use]
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Score every document, highest first. Equal scores keep document order.
    #[must_use]
    pub fn score(&self, query: &str) -> Vec<(usize, f64)> {
        let query_tokens = tokenize(query);
        let mut scored: Vec<(usize, f64)> = self
            .docs
            .iter()
            .enumerate()
            .map(|(idx, doc)| (idx, self.score_doc(doc, &query_tokens)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored
    }

    fn score_doc(&self, doc: &Document, query_tokens: &[String]) -> f64 {
        let dl = doc.len as f64;
        let mut score = 0.0;
        for token in query_tokens {
            let Some(idf) = self.idf.get(token) else {
                continue;
            };
            let freq = doc.term_freq.get(token).copied().unwrap_or(0) as f64;
            if freq <= 0.0 {
                continue;
            }
            let denom = freq + self.cfg.k1 * (1.0 - self.cfg.b + self.cfg.b * dl / self.avg_len);
            score += idf * (freq * (self.cfg.k1 + 1.0)) / denom;
        }
        score
    }
}

/// Rank raw documents against a query with default parameters.
#[must_use]
pub fn rank<S: AsRef<str>>(documents: &[S], query: &str) -> Vec<(usize, f64)> {
    Corpus::fit(documents).score(query)
}

/// Query terms that the corpus knows about, deduplicated in query order.
#[must_use]
pub fn known_terms(corpus: &Corpus, query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .into_iter()
        .filter(|t| corpus.idf(t).is_some() && seen.insert(t.clone()))
        .collect()
}

fn bm25_idf(total_docs: f64, df: f64) -> f64 {
    ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln()
}
