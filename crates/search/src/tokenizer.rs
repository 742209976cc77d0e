/// Tokens of this many characters or fewer are dropped.
const MIN_TOKEN_CHARS: usize = 2;

/// Normalize text into lowercase alphanumeric words longer than two characters.
///
/// Every character that is not a letter, digit or whitespace becomes a
/// separator, so `"log-in"` yields no token while `"stack_trace"` yields
/// `["stack", "trace"]`.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}
