use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// One synonym rule: whole-word `term` is rewritten to `canonical`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub term: String,
    pub canonical: String,
}

impl Synonym {
    pub fn new(term: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            canonical: canonical.into(),
        }
    }
}

/// Normalizes task text by rewriting synonyms to canonical phrases
/// before keyword scoring, so "ci" and "pipeline" score the same.
#[derive(Clone, Debug)]
pub struct SynonymExpander {
    /// Longest term first; equal lengths keep configuration order.
    rules: Vec<(Regex, String)>,
}

impl SynonymExpander {
    pub fn new(synonyms: &[Synonym]) -> Result<Self> {
        let mut ordered: Vec<&Synonym> = synonyms.iter().collect();
        ordered.sort_by_key(|s| std::cmp::Reverse(s.term.chars().count()));

        let mut rules = Vec::with_capacity(ordered.len());
        for synonym in ordered {
            let pattern = format!(r"\b{}\b", regex::escape(&synonym.term));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| {
                    SearchError::invalid_table(format!("synonym '{}': {err}", synonym.term))
                })?;
            rules.push((regex, synonym.canonical.clone()));
        }
        Ok(Self { rules })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Lowercase `text` and apply every rule in order.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        let mut result = text.to_lowercase();
        for (regex, canonical) in &self.rules {
            if regex.is_match(&result) {
                result = regex
                    .replace_all(&result, NoExpand(canonical.as_str()))
                    .into_owned();
            }
        }
        result
    }
}

impl Default for SynonymExpander {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expander() -> SynonymExpander {
        SynonymExpander::new(&[
            Synonym::new("ci", "github actions"),
            Synonym::new("ci/cd", "github actions"),
            Synonym::new("pipeline", "github actions"),
            Synonym::new("db", "database"),
            Synonym::new("specs", "tests"),
        ])
        .unwrap()
    }

    #[test]
    fn rewrites_whole_words_case_insensitively() {
        let exp = expander();
        assert_eq!(exp.expand("Fix the CI"), "fix the github actions");
        assert_eq!(exp.expand("broken pipeline"), "broken github actions");
    }

    #[test]
    fn longest_term_wins() {
        assert_eq!(expander().expand("ci/cd failing"), "github actions failing");
    }

    #[test]
    fn does_not_touch_partial_words() {
        let exp = expander();
        assert_eq!(exp.expand("decide dbx"), "decide dbx");
        assert_eq!(exp.expand("run specs"), "run tests");
    }

    #[test]
    fn empty_expander_only_lowercases() {
        assert_eq!(SynonymExpander::empty().expand("Deploy NOW"), "deploy now");
    }

    #[test]
    fn canonical_text_is_literal() {
        let exp = SynonymExpander::new(&[Synonym::new("cash", "$1 money")]).unwrap();
        assert_eq!(exp.expand("cash flow"), "$1 money flow");
    }
}
