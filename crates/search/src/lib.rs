//! # HTKit Search
//!
//! Routes free-text help queries to a curated catalog of workflows and ranks
//! small reference tables.
//!
//! ```text
//! query text
//!     │
//!     ├──> tokenize ──> Corpus (BM25) ──> ranked rows
//!     │
//!     └──> IntentClassifier ──> overview | category | search
//!                           └──> TaskScorer ──> Recommendation (maybe ambiguous)
//! ```
//!
//! Everything is rebuilt per call from immutable inputs; the only shared
//! state is the injected [`CategoryTable`].

mod bm25;
mod category_table;
mod error;
mod fuzzy;
mod query_classifier;
mod query_expansion;
mod router;
mod row_search;
mod task_scorer;
mod tokenizer;

pub use bm25::{known_terms, rank, Bm25Config, Corpus};
pub use category_table::{Category, CategoryTable, Guide, GuideStep};
pub use error::{Result, SearchError};
pub use fuzzy::{edit_distance, fuzzy_equal, fuzzy_match, DEFAULT_EDIT_THRESHOLD};
pub use query_classifier::{IntentClassifier, IntentKind};
pub use query_expansion::{Synonym, SynonymExpander};
pub use router::{classify_and_recommend, Intent};
pub use row_search::{detect_domain, search_rows, Row, RowHit, RowSearch, RowSearchResult};
pub use task_scorer::{
    CategoryScore, Recommendation, TaskScorer, ACTION_VERBS, DISAMBIGUATION_THRESHOLD,
    FUZZY_PENALTY, LEADING_ACTION_WEIGHT, MAX_CANDIDATES, PHRASE_WEIGHT, SINGLE_WORD_WEIGHT,
    TRAILING_ACTION_WEIGHT,
};
pub use tokenizer::tokenize;
