use std::collections::HashMap;

const FENCE: &str = "---";

/// Flat `key: value` pairs from a markdown frontmatter block.
///
/// The content must open with `---`; the block runs to the next `---`.
/// Lines without a colon are ignored and only the first colon splits.
#[must_use]
pub fn parse_frontmatter(content: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let Some(rest) = content.strip_prefix(FENCE) else {
        return fields;
    };
    let Some(end) = rest.find(FENCE) else {
        return fields;
    };

    for line in rest[..end].trim().lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    fields
}
