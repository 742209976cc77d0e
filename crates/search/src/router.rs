use serde::{Deserialize, Serialize};

use crate::category_table::CategoryTable;
use crate::query_classifier::{IntentClassifier, IntentKind};
use crate::task_scorer::{Recommendation, TaskScorer};

/// A classified input together with the data its intent needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Overview,
    Category { name: String },
    Task { recommendation: Recommendation },
    Search { term: String },
}

impl Intent {
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::Overview => IntentKind::Overview,
            Self::Category { .. } => IntentKind::Category,
            Self::Task { .. } => IntentKind::Task,
            Self::Search { .. } => IntentKind::Search,
        }
    }
}

/// Classify free text and, for tasks, score it against the category table.
pub fn classify_and_recommend<I, S>(input: &str, known_names: I, table: &CategoryTable) -> Intent
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let classifier = IntentClassifier::new(table, known_names);
    let kind = classifier.classify(input);
    log::debug!("classified '{input}' as {kind:?}");

    match kind {
        IntentKind::Overview => Intent::Overview,
        IntentKind::Category => match classifier.resolve_category(input) {
            Some(name) => Intent::Category { name },
            None => Intent::Search {
                term: input.trim().to_string(),
            },
        },
        IntentKind::Task => Intent::Task {
            recommendation: TaskScorer::new(table).recommend(input),
        },
        IntentKind::Search => Intent::Search {
            term: input.trim().to_string(),
        },
    }
}
