use serde::{Deserialize, Serialize};

use crate::category_table::CategoryTable;
use crate::fuzzy::fuzzy_match;

/// What a piece of free text is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Nothing typed: show everything.
    Overview,
    /// A single word naming a workflow or category, possibly with a typo.
    Category,
    /// A task description to score against category keywords.
    Task,
    /// An unrecognized term for plain catalog search.
    Search,
}

/// Routes free text to an [`IntentKind`].
///
/// Precedence is exact name > fuzzy name > fuzzy keyword > search. Any input
/// of two or more words is a task before any matching happens, so a
/// multi-word category name is still treated as a task.
pub struct IntentClassifier<'a> {
    table: &'a CategoryTable,
    known_names: Vec<String>,
}

impl<'a> IntentClassifier<'a> {
    /// `known_names` are workflow names; a leading `/` is ignored.
    pub fn new<I, S>(table: &'a CategoryTable, known_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in known_names {
            let name = name.as_ref().trim().trim_start_matches('/').to_lowercase();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            table,
            known_names: names,
        }
    }

    #[must_use]
    pub fn known_names(&self) -> &[String] {
        &self.known_names
    }

    #[must_use]
    pub fn classify(&self, input: &str) -> IntentKind {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return IntentKind::Overview;
        }

        if trimmed.split_whitespace().count() >= 2 {
            return IntentKind::Task;
        }

        let word = trimmed.to_lowercase();
        if self.exact_name(&word).is_some() || self.fuzzy_name(&word).is_some() {
            return IntentKind::Category;
        }

        if self
            .table
            .single_word_keywords()
            .any(|kw| fuzzy_match(&word, kw))
        {
            log::debug!("'{word}' fuzzy-matches a task keyword");
            return IntentKind::Task;
        }

        IntentKind::Search
    }

    /// Canonical name for a single-word category lookup.
    ///
    /// Category keys are tried first, exact then fuzzy in table order, so a
    /// near-miss still lands on a guide. Workflow names come after, exact
    /// then fuzzy in catalog order.
    #[must_use]
    pub fn resolve_category(&self, input: &str) -> Option<String> {
        let word = input.trim().trim_start_matches('/').to_lowercase();
        if word.is_empty() {
            return None;
        }
        self.exact_key(&word)
            .or_else(|| self.fuzzy_key(&word))
            .or_else(|| self.exact_workflow(&word))
            .or_else(|| self.fuzzy_workflow(&word))
    }

    fn exact_name(&self, word: &str) -> Option<String> {
        self.exact_key(word).or_else(|| self.exact_workflow(word))
    }

    fn fuzzy_name(&self, word: &str) -> Option<String> {
        self.fuzzy_key(word).or_else(|| self.fuzzy_workflow(word))
    }

    fn exact_key(&self, word: &str) -> Option<String> {
        self.table.category(word).map(|c| c.key.clone())
    }

    fn fuzzy_key(&self, word: &str) -> Option<String> {
        self.table
            .categories()
            .iter()
            .find(|c| fuzzy_match(word, &c.key.to_lowercase()))
            .map(|c| c.key.clone())
    }

    fn exact_workflow(&self, word: &str) -> Option<String> {
        self.known_names.iter().find(|n| n.as_str() == word).cloned()
    }

    fn fuzzy_workflow(&self, word: &str) -> Option<String> {
        self.known_names
            .iter()
            .find(|n| fuzzy_match(word, n))
            .cloned()
    }
}
