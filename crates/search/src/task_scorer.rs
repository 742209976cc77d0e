use std::cmp::Ordering;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category_table::CategoryTable;
use crate::fuzzy::fuzzy_match;

/// Weight of a multi-word keyword found verbatim in the task text.
pub const PHRASE_WEIGHT: f64 = 3.0;
/// Weight of any single-word match when the task is one word long.
pub const SINGLE_WORD_WEIGHT: f64 = 2.0;
/// Weight of a match on the leading action verb.
pub const LEADING_ACTION_WEIGHT: f64 = 2.5;
/// Weight of a match after a leading action verb.
pub const TRAILING_ACTION_WEIGHT: f64 = 1.0;
/// Multiplier applied to matches found only by edit distance.
pub const FUZZY_PENALTY: f64 = 0.8;
/// Top-two gap below which a recommendation is ambiguous.
pub const DISAMBIGUATION_THRESHOLD: f64 = 0.5;
/// How many candidates an ambiguous recommendation offers.
pub const MAX_CANDIDATES: usize = 3;

/// Verbs that mark a sentence as action-first.
pub const ACTION_VERBS: &[&str] = &[
    "fix",
    "debug",
    "test",
    "create",
    "build",
    "implement",
    "deploy",
    "plan",
    "design",
    "review",
    "check",
    "verify",
    "find",
    "search",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

/// Ranked categories for a task, plus whether the top two are too close to
/// commit to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    pub scores: Vec<CategoryScore>,
    pub ambiguous: bool,
}

impl Recommendation {
    fn from_scores(mut scores: Vec<CategoryScore>) -> Self {
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        let ambiguous = match scores.as_slice() {
            [top, second, ..] => {
                top.score > 0.0 && top.score - second.score < DISAMBIGUATION_THRESHOLD
            }
            _ => false,
        };
        Self { scores, ambiguous }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The committed category, if the result is neither empty nor ambiguous.
    #[must_use]
    pub fn top(&self) -> Option<&CategoryScore> {
        if self.ambiguous {
            None
        } else {
            self.scores.first()
        }
    }

    /// Runners-up shown next to a committed recommendation.
    #[must_use]
    pub fn alternatives(&self) -> &[CategoryScore] {
        if self.scores.len() < 2 {
            return &[];
        }
        let end = self.scores.len().min(MAX_CANDIDATES);
        &self.scores[1..end]
    }

    /// The equally plausible candidates of an ambiguous result.
    #[must_use]
    pub fn candidates(&self) -> &[CategoryScore] {
        if !self.ambiguous {
            return &[];
        }
        let end = self.scores.len().min(MAX_CANDIDATES);
        &self.scores[..end]
    }
}

/// Scores task text against every category's trigger keywords.
pub struct TaskScorer<'a> {
    table: &'a CategoryTable,
}

impl<'a> TaskScorer<'a> {
    #[must_use]
    pub const fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn recommend(&self, task: &str) -> Recommendation {
        let text = self.table.expander().expand(task);
        let words = word_spans(&text);
        let first_is_action = words
            .first()
            .is_some_and(|(_, word)| ACTION_VERBS.contains(word));

        let mut scores = Vec::new();
        for category in self.table.categories() {
            let mut score = 0.0;
            for keyword in &category.keywords {
                if keyword.contains(' ') {
                    if text.contains(keyword.as_str()) {
                        score += PHRASE_WEIGHT;
                    }
                    continue;
                }

                let pattern = self.table.keyword_pattern(keyword);
                let Some(hit) = locate_keyword(&text, &words, keyword, pattern) else {
                    continue;
                };
                let weight = position_weight(hit, words.len(), first_is_action);
                log::debug!(
                    "{}: '{keyword}' at word {} (fuzzy: {}) -> {weight:.2}",
                    category.key,
                    hit.position,
                    hit.fuzzy
                );
                score += weight;
            }
            if score > 0.0 {
                scores.push(CategoryScore {
                    category: category.key.clone(),
                    score,
                });
            }
        }

        Recommendation::from_scores(scores)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeywordHit {
    position: usize,
    fuzzy: bool,
}

/// Whitespace-separated words with their starting byte offsets.
fn word_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, &text[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, &text[s..]));
    }
    spans
}

/// Whole-word match first; otherwise the first word within fuzzy reach.
fn locate_keyword(
    text: &str,
    words: &[(usize, &str)],
    keyword: &str,
    pattern: Option<&Regex>,
) -> Option<KeywordHit> {
    let exact = pattern.and_then(|re| re.find(text));
    if let Some(found) = exact {
        let start = found.start();
        return words
            .iter()
            .position(|(offset, word)| *offset <= start && start < offset + word.len())
            .map(|position| KeywordHit {
                position,
                fuzzy: false,
            });
    }

    words
        .iter()
        .position(|(_, word)| fuzzy_match(word, keyword))
        .map(|position| KeywordHit {
            position,
            fuzzy: true,
        })
}

fn position_weight(hit: KeywordHit, word_count: usize, first_is_action: bool) -> f64 {
    let weight = if word_count <= 1 {
        SINGLE_WORD_WEIGHT
    } else if first_is_action && hit.position == 0 {
        LEADING_ACTION_WEIGHT
    } else if first_is_action {
        TRAILING_ACTION_WEIGHT
    } else {
        1.0 + hit.position as f64 / (word_count - 1) as f64
    };

    if hit.fuzzy {
        weight * FUZZY_PENALTY
    } else {
        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_table::Category;
    use crate::query_expansion::Synonym;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    fn small_table() -> CategoryTable {
        CategoryTable::new(
            vec![
                Category::new("fix", ["fix", "bug", "error"]),
                Category::new("debug", ["debug", "trace"]),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn score_of(rec: &Recommendation, category: &str) -> Option<f64> {
        rec.scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
    }

    #[test]
    fn debug_login_error_commits_to_debug() {
        let table = small_table();
        let rec = TaskScorer::new(&table).recommend("debug login error");

        assert!(approx(score_of(&rec, "debug").unwrap(), 2.5));
        assert!(approx(score_of(&rec, "fix").unwrap(), 1.0));
        assert!(!rec.ambiguous);
        assert_eq!(rec.top().unwrap().category, "debug");
        let alternatives: Vec<&str> = rec
            .alternatives()
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(alternatives, vec!["fix"]);
    }

    #[test]
    fn later_positions_weigh_more_without_leading_verb() {
        let table = small_table();
        let rec = TaskScorer::new(&table).recommend("login page bug");
        // position 2 of 3 words: 1 + 2/2
        assert!(approx(score_of(&rec, "fix").unwrap(), 2.0));

        let rec = TaskScorer::new(&table).recommend("bug in login page");
        assert!(approx(score_of(&rec, "fix").unwrap(), 1.0));
    }

    #[test]
    fn single_word_task_uses_flat_weight() {
        let table = small_table();
        let rec = TaskScorer::new(&table).recommend("bug");
        assert!(approx(score_of(&rec, "fix").unwrap(), SINGLE_WORD_WEIGHT));
    }

    #[test]
    fn fuzzy_matches_are_penalized() {
        let table = small_table();
        // "tracee" is one edit from "trace", at position 1 of 2 words.
        let rec = TaskScorer::new(&table).recommend("login tracee");
        assert!(approx(score_of(&rec, "debug").unwrap(), 2.0 * FUZZY_PENALTY));
    }

    #[test]
    fn phrases_add_fixed_weight() {
        let table = CategoryTable::new(
            vec![Category::new("debug", ["root cause", "stack trace"])],
            Vec::new(),
        )
        .unwrap();
        let rec = TaskScorer::new(&table).recommend("Find the ROOT CAUSE of this stack trace");
        assert!(approx(score_of(&rec, "debug").unwrap(), 2.0 * PHRASE_WEIGHT));
    }

    #[test]
    fn synonyms_expand_before_scoring() {
        let table = CategoryTable::new(
            vec![Category::new("deploy", ["github actions"])],
            vec![
                Synonym::new("ci", "github actions"),
                Synonym::new("pipeline", "github actions"),
            ],
        )
        .unwrap();
        let scorer = TaskScorer::new(&table);
        let a = scorer.recommend("fix ci");
        let b = scorer.recommend("fix pipeline");
        assert!(approx(score_of(&a, "deploy").unwrap(), PHRASE_WEIGHT));
        assert_eq!(a, b);
    }

    #[test]
    fn near_tie_is_ambiguous() {
        let rec = Recommendation::from_scores(vec![
            CategoryScore {
                category: "plan".into(),
                score: 2.2,
            },
            CategoryScore {
                category: "fix".into(),
                score: 2.5,
            },
        ]);
        assert!(rec.ambiguous);
        assert_eq!(rec.top(), None);
        let candidates: Vec<&str> = rec
            .candidates()
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(candidates, vec!["fix", "plan"]);
    }

    #[test]
    fn clear_winner_is_not_ambiguous() {
        let rec = Recommendation::from_scores(vec![
            CategoryScore {
                category: "fix".into(),
                score: 5.0,
            },
            CategoryScore {
                category: "plan".into(),
                score: 1.0,
            },
        ]);
        assert!(!rec.ambiguous);
        assert_eq!(rec.top().unwrap().category, "fix");
        assert!(rec.candidates().is_empty());
    }

    #[test]
    fn candidates_are_capped_at_three() {
        let scores = ["a", "b", "c", "d"]
            .iter()
            .map(|c| CategoryScore {
                category: (*c).to_string(),
                score: 1.0,
            })
            .collect();
        let rec = Recommendation::from_scores(scores);
        assert!(rec.ambiguous);
        let names: Vec<&str> = rec
            .candidates()
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn nothing_matches_yields_empty() {
        let table = small_table();
        let rec = TaskScorer::new(&table).recommend("order pizza tonight");
        assert!(rec.is_empty());
        assert!(!rec.ambiguous);
        assert!(rec.top().is_none());
    }

    #[test]
    fn empty_table_yields_empty() {
        let table = CategoryTable::empty();
        assert!(TaskScorer::new(&table).recommend("fix the bug").is_empty());
    }

    #[test]
    fn builtin_table_recommends_debug_for_login_error() {
        let table = CategoryTable::builtin();
        let rec = TaskScorer::new(&table).recommend("debug login error");
        assert_eq!(rec.top().unwrap().category, "debug");
    }

    #[test]
    fn positional_gap_of_one_half_is_ambiguous() {
        let table = CategoryTable::new(
            vec![
                Category::new("fix", ["bug"]),
                Category::new("debug", ["trace"]),
            ],
            Vec::new(),
        )
        .unwrap();
        // 1 + 4/6 against 1 + 1/6: the gap lands just under the threshold.
        let rec = TaskScorer::new(&table).recommend("the trace shows login bug page here");
        assert_eq!(rec.scores[0].category, "fix");
        assert!(rec.scores[0].score - rec.scores[1].score < DISAMBIGUATION_THRESHOLD);
        assert!(rec.ambiguous);
        assert_eq!(rec.top(), None);
        let candidates: Vec<&str> = rec
            .candidates()
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(candidates, vec!["fix", "debug"]);
    }

    #[test]
    fn word_spans_track_offsets() {
        assert_eq!(
            word_spans("  fix  the bug"),
            vec![(2, "fix"), (7, "the"), (11, "bug")]
        );
        assert!(word_spans("   ").is_empty());
    }
}
