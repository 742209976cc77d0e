use std::fmt::Write;

use htkit_protocol::{
    CatalogKind, GuideOutput, HelpBody, HelpResponse, MultiTableSearchResponse, ScoredCategory,
    TableRow, TableSearchResponse,
};

const TABLE_VALUE_CHARS: usize = 300;

/// Markdown for an `ht-help` response, led by its output-type marker.
#[must_use]
pub fn render_help(response: &HelpResponse) -> String {
    let mut out = String::new();
    line(&mut out, &response.output_type.marker());
    line(&mut out, "");

    match &response.body {
        HelpBody::Overview { workflows, skills } => {
            line(&mut out, "# HTKit Commands");
            line(&mut out, "");
            line(
                &mut out,
                &format!("{} workflows, {} skills.", workflows.len(), skills.len()),
            );
            line(&mut out, "");
            for row in [
                "**Quick Start:**",
                "- `/plan` - Lập kế hoạch triển khai",
                "- `/fix` - Phân tích và sửa lỗi",
                "- `/debug` - Debug mà không tự sửa",
                "- `/test` - Chạy test và phân tích kết quả",
                "",
                "**Common Workflows:**",
                "- Feature mới: `/plan` → approve → implement → `/test`",
                "- Bug fix: `/debug` → `/fix` → `/test`",
                "- Deploy: `/test` → `/deploy`",
                "- Review: `/watzup` → `/status`",
                "",
                "**Workflows:**",
            ] {
                line(&mut out, row);
            }
            for wf in workflows {
                let power = if wf.power_level > 0 {
                    format!(" {}", "⚡".repeat(wf.power_level))
                } else {
                    String::new()
                };
                line(
                    &mut out,
                    &format!("- `{}`{power} — {}", wf.name, wf.description),
                );
            }
            line(&mut out, "");
            for row in [
                "**Usage:**",
                "- `/ht-help <workflow>` - Hướng dẫn workflow cụ thể",
                "- `/ht-help <task description>` - Gợi ý workflow phù hợp",
                "",
                "**Tips:**",
                "- Dùng `/vn` cho dự án Việt Nam",
                "- Dùng `/ask` cho câu hỏi kỹ thuật nhanh",
                "- Dùng `/bootstrap` để khởi tạo dự án mới",
            ] {
                line(&mut out, row);
            }
        }
        HelpBody::Category {
            guide, available, ..
        } => match guide {
            Some(guide) => render_guide(&mut out, guide, true),
            None => {
                line(
                    &mut out,
                    &format!("Workflow '{}' not found.", response.input),
                );
                line(&mut out, "");
                line(
                    &mut out,
                    &format!("Available: {}", backticked(available, "")),
                );
            }
        },
        HelpBody::Task {
            task,
            recommended,
            guide,
            alternatives,
            candidates,
            available,
            ..
        } => {
            if !candidates.is_empty() {
                render_disambiguation(&mut out, task, candidates);
            } else if let Some(top) = recommended {
                line(&mut out, &format!("# Recommended: /{}", top.category));
                line(&mut out, "");
                if let Some(guide) = guide {
                    line(&mut out, &format!("**{}**", guide.title));
                    line(&mut out, "");
                    render_guide_body(&mut out, guide, false);
                }
                if !alternatives.is_empty() {
                    let names: Vec<String> = alternatives
                        .iter()
                        .map(|alt| format!("`/{}`", alt.category))
                        .collect();
                    line(&mut out, "");
                    line(&mut out, &format!("**Alternatives:** {}", names.join(", ")));
                }
            } else {
                line(&mut out, &format!("Not sure about: {task}"));
                line(&mut out, "");
                line(&mut out, &format!("Try: {}", backticked(available, "/")));
            }
        }
        HelpBody::Search {
            term,
            total,
            matches,
            available,
        } => {
            if matches.is_empty() {
                line(&mut out, &format!("No results for '{term}'."));
                line(&mut out, "");
                line(
                    &mut out,
                    &format!("Try browsing: {}", backticked(available, "")),
                );
            } else {
                line(&mut out, &format!("# Search: {term}"));
                line(&mut out, "");
                line(&mut out, &format!("Found {total} matches:"));
                for hit in matches {
                    let prefix = match hit.kind {
                        CatalogKind::Workflow => "📋",
                        CatalogKind::Skill => "🔧",
                    };
                    line(
                        &mut out,
                        &format!("- {prefix} `{}` — {}", hit.name, hit.description),
                    );
                }
            }
        }
    }

    out
}

fn render_guide(out: &mut String, guide: &GuideOutput, heading: bool) {
    if heading {
        line(out, &format!("# {}", guide.title));
        line(out, "");
    }
    render_guide_body(out, guide, true);
}

fn render_guide_body(out: &mut String, guide: &GuideOutput, labelled: bool) {
    if !guide.steps.is_empty() {
        if labelled {
            line(out, "**Workflow:**");
        }
        for step in &guide.steps {
            line(out, &format!("- {}: {}", step.label, step.command));
        }
        line(out, "");
    }
    if let Some(tip) = &guide.tip {
        line(out, &format!("*Tip: {tip}*"));
    }
}

fn render_disambiguation(out: &mut String, task: &str, candidates: &[ScoredCategory]) {
    line(out, &format!("# Clarify: {task}"));
    line(out, "");
    line(out, "Matches multiple workflows:");
    line(out, "");
    for (idx, candidate) in candidates.iter().enumerate() {
        let title = candidate
            .title
            .clone()
            .unwrap_or_else(|| title_case(&candidate.category));
        line(
            out,
            &format!("{}. **{title}** — `/{}`", idx + 1, candidate.category),
        );
    }
    line(out, "");
    line(out, "*Reply with workflow name or rephrase.*");
}

/// Markdown for an `ht-search` response.
#[must_use]
pub fn render_table_search(response: &TableSearchResponse) -> String {
    let mut out = String::new();
    line(&mut out, "## Table Search Results");
    line(
        &mut out,
        &format!(
            "**Domain:** {} | **Query:** {}",
            response.domain, response.query
        ),
    );
    line(
        &mut out,
        &format!(
            "**Source:** {} | **Found:** {} results",
            response.file, response.count
        ),
    );
    line(&mut out, "");
    render_rows(&mut out, &response.results, "###");
    out
}

/// Markdown for `ht-search --all`: one section per domain.
#[must_use]
pub fn render_table_search_all(response: &MultiTableSearchResponse) -> String {
    let mut out = String::new();
    line(&mut out, "## Multi-Domain Search Results");
    line(
        &mut out,
        &format!(
            "**Query:** {} | **Found:** {} results",
            response.query, response.total
        ),
    );
    line(&mut out, "");
    for domain in &response.domains {
        line(
            &mut out,
            &format!(
                "### {} ({}): {} results",
                domain.domain, domain.file, domain.count
            ),
        );
        line(&mut out, "");
        render_rows(&mut out, &domain.results, "####");
    }
    out
}

fn render_rows(out: &mut String, rows: &[TableRow], heading: &str) {
    for (idx, row) in rows.iter().enumerate() {
        line(out, &format!("{heading} Result {}", idx + 1));
        for column in &row.columns {
            line(out, &format!("- **{}:** {}", column.name, clip(&column.value)));
        }
        line(out, "");
    }
}

fn clip(value: &str) -> String {
    if value.chars().count() > TABLE_VALUE_CHARS {
        let head: String = value.chars().take(TABLE_VALUE_CHARS).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

fn backticked(keys: &[String], prefix: &str) -> String {
    keys.iter()
        .map(|key| format!("`{prefix}{key}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn line(out: &mut String, text: &str) {
    let _ = writeln!(out, "{text}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use htkit_protocol::{
        CatalogHit, GuideStepOutput, OutputType, TableColumn, RESPONSE_SCHEMA_VERSION,
    };

    fn guide() -> GuideOutput {
        GuideOutput {
            key: "fix".to_string(),
            title: "Sửa Lỗi — /fix".to_string(),
            steps: vec![GuideStepOutput {
                label: "Bắt đầu".to_string(),
                command: "`/fix`".to_string(),
            }],
            tip: Some("Gửi kèm error message".to_string()),
        }
    }

    fn scored(category: &str, title: Option<&str>) -> ScoredCategory {
        ScoredCategory {
            category: category.to_string(),
            score: 1.0,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn category_guide_has_workflow_and_tip() {
        let response = HelpResponse::new(
            OutputType::CategoryGuide,
            "fix",
            HelpBody::Category {
                name: "fix".to_string(),
                guide: Some(guide()),
                available: Vec::new(),
            },
        );
        let text = render_help(&response);
        assert!(text.starts_with("@HT_OUTPUT_TYPE:category-guide\n"));
        assert!(text.contains("# Sửa Lỗi — /fix"));
        assert!(text.contains("**Workflow:**"));
        assert!(text.contains("- Bắt đầu: `/fix`"));
        assert!(text.contains("*Tip: Gửi kèm error message*"));
    }

    #[test]
    fn missing_guide_lists_available() {
        let response = HelpResponse::new(
            OutputType::CategoryGuide,
            "brainstorm",
            HelpBody::Category {
                name: "brainstorm".to_string(),
                guide: None,
                available: vec!["ask".to_string(), "fix".to_string()],
            },
        );
        let text = render_help(&response);
        assert!(text.contains("Workflow 'brainstorm' not found."));
        assert!(text.contains("Available: `ask`, `fix`"));
    }

    #[test]
    fn recommendation_lists_alternatives() {
        let response = HelpResponse::new(
            OutputType::TaskRecommendations,
            "fix login bug",
            HelpBody::Task {
                task: "fix login bug".to_string(),
                ambiguous: false,
                recommended: Some(scored("fix", Some("Sửa Lỗi — /fix"))),
                guide: Some(guide()),
                alternatives: vec![scored("debug", None)],
                candidates: Vec::new(),
                available: Vec::new(),
            },
        );
        let text = render_help(&response);
        assert!(text.contains("# Recommended: /fix"));
        assert!(text.contains("**Sửa Lỗi — /fix**"));
        assert!(!text.contains("**Workflow:**"));
        assert!(text.contains("**Alternatives:** `/debug`"));
    }

    #[test]
    fn ambiguous_task_asks_to_clarify() {
        let response = HelpResponse::new(
            OutputType::TaskRecommendations,
            "check build",
            HelpBody::Task {
                task: "check build".to_string(),
                ambiguous: true,
                recommended: None,
                guide: None,
                alternatives: Vec::new(),
                candidates: vec![scored("test", Some("Chạy Test — /test")), scored("ship", None)],
                available: Vec::new(),
            },
        );
        let text = render_help(&response);
        assert!(text.contains("# Clarify: check build"));
        assert!(text.contains("1. **Chạy Test — /test** — `/test`"));
        assert!(text.contains("2. **Ship** — `/ship`"));
    }

    #[test]
    fn unmatched_task_falls_back_to_listing() {
        let response = HelpResponse::new(
            OutputType::TaskRecommendations,
            "order pizza",
            HelpBody::Task {
                task: "order pizza".to_string(),
                ambiguous: false,
                recommended: None,
                guide: None,
                alternatives: Vec::new(),
                candidates: Vec::new(),
                available: vec!["ask".to_string(), "fix".to_string()],
            },
        );
        let text = render_help(&response);
        assert!(text.contains("Not sure about: order pizza"));
        assert!(text.contains("Try: `/ask`, `/fix`"));
    }

    #[test]
    fn search_results_use_kind_prefixes() {
        let response = HelpResponse::new(
            OutputType::SearchResults,
            "auth",
            HelpBody::Search {
                term: "auth".to_string(),
                total: 1,
                matches: vec![CatalogHit {
                    kind: CatalogKind::Skill,
                    name: "better-auth".to_string(),
                    description: "Auth".to_string(),
                }],
                available: Vec::new(),
            },
        );
        let text = render_help(&response);
        assert!(text.contains("# Search: auth"));
        assert!(text.contains("Found 1 matches:"));
        assert!(text.contains("- 🔧 `better-auth` — Auth"));
    }

    #[test]
    fn table_values_are_clipped() {
        let response = TableSearchResponse {
            schema_version: RESPONSE_SCHEMA_VERSION,
            domain: "style".to_string(),
            query: "retro".to_string(),
            file: "styles.json".to_string(),
            count: 1,
            matched_terms: vec!["retro".to_string()],
            results: vec![TableRow {
                score: 1.2,
                columns: vec![TableColumn {
                    name: "Ideas".to_string(),
                    value: "x".repeat(400),
                }],
            }],
        };
        let text = render_table_search(&response);
        assert!(text.contains("**Domain:** style | **Query:** retro"));
        assert!(text.contains("### Result 1"));
        assert!(text.contains(&format!("- **Ideas:** {}...", "x".repeat(300))));
        assert!(!text.contains(&"x".repeat(301)));
    }

    #[test]
    fn search_all_renders_a_section_per_domain() {
        let domain = |name: &str, count: usize| TableSearchResponse {
            schema_version: RESPONSE_SCHEMA_VERSION,
            domain: name.to_string(),
            query: "retro".to_string(),
            file: format!("{name}.csv"),
            count,
            matched_terms: Vec::new(),
            results: (0..count)
                .map(|_| TableRow {
                    score: 1.0,
                    columns: vec![TableColumn {
                        name: "Name".to_string(),
                        value: "Retro".to_string(),
                    }],
                })
                .collect(),
        };
        let response = MultiTableSearchResponse {
            schema_version: RESPONSE_SCHEMA_VERSION,
            query: "retro".to_string(),
            total: 1,
            domains: vec![domain("style", 1), domain("music", 0)],
        };
        let text = render_table_search_all(&response);
        assert!(text.contains("**Query:** retro | **Found:** 1 results"));
        assert!(text.contains("### style (style.csv): 1 results"));
        assert!(text.contains("#### Result 1"));
        assert!(text.contains("### music (music.csv): 0 results"));
    }
}
