/// Default edit budget for [`fuzzy_equal`].
pub const DEFAULT_EDIT_THRESHOLD: usize = 2;

/// Words shorter than this only ever match exactly.
const MIN_FUZZY_CHARS: usize = 3;

/// Levenshtein distance over chars, using a single rolling row sized to the
/// shorter input.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(lc != sc);
            let insertion = row[j + 1] + 1;
            let deletion = row[j] + 1;
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(insertion).min(deletion);
        }
    }
    row[short.len()]
}

/// Bounded fuzzy equality used for keyword and category matching.
///
/// Gates, in order: short words are exact-only, exact equality always
/// matches, lengths may differ by at most one, and the edit budget scales
/// with the target (`min(threshold, len(target) / 3)`).
#[must_use]
pub fn fuzzy_equal(word: &str, target: &str, threshold: usize) -> bool {
    let word_len = word.chars().count();
    if word_len < MIN_FUZZY_CHARS {
        return word == target;
    }
    if word == target {
        return true;
    }

    let target_len = target.chars().count();
    if word_len.abs_diff(target_len) > 1 {
        return false;
    }

    let budget = threshold.min(target_len / 3);
    if budget < 1 {
        return false;
    }

    edit_distance(word, target) <= budget
}

/// [`fuzzy_equal`] with [`DEFAULT_EDIT_THRESHOLD`].
#[must_use]
pub fn fuzzy_match(word: &str, target: &str) -> bool {
    fuzzy_equal(word, target, DEFAULT_EDIT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("debug", "debgu"), 2);
    }

    #[test]
    fn distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("việt", "viet"), 1);
    }

    #[test]
    fn short_words_match_exactly_only() {
        assert!(fuzzy_match("ab", "ab"));
        assert!(!fuzzy_match("ab", "cd"));
        assert!(!fuzzy_match("to", "do"));
        assert!(!fuzzy_match("fx", "fix"));
    }

    #[test]
    fn length_gate_rejects_distant_lengths() {
        assert!(fuzzy_match("tests", "test"));
        assert!(!fuzzy_match("testing", "test"));
    }

    #[test]
    fn budget_scales_with_target_length() {
        // "fix" allows one edit, so a single substitution passes.
        assert!(fuzzy_match("fox", "fix"));
        // Two-char targets have zero budget: exact only.
        assert!(!fuzzy_match("vnn", "vn"));
        // Six-char targets allow two edits.
        assert!(fuzzy_match("dpeloy", "deploy"));
        assert!(!fuzzy_match("dxxlox", "deploy"));
    }

    #[test]
    fn explicit_threshold_caps_budget() {
        assert!(!fuzzy_equal("dpeloy", "deploy", 1));
        assert!(fuzzy_equal("deplay", "deploy", 1));
    }

    #[test]
    fn empty_inputs_are_total() {
        assert!(fuzzy_match("", ""));
        assert!(!fuzzy_match("", "fix"));
        assert!(!fuzzy_match("fix", ""));
    }

    proptest! {
        #[test]
        fn proptest_distance_is_symmetric(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
            prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
        }

        #[test]
        fn proptest_short_words_never_fuzzy(word in "[a-z]{0,2}", target in "[a-z]{0,8}") {
            prop_assert_eq!(fuzzy_match(&word, &target), word == target);
        }
    }
}
