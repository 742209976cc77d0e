use htkit_catalog::{Catalog, CatalogMatch, EntryKind, Skill, Workflow};
use htkit_protocol::{
    CatalogHit, CatalogKind, GuideOutput, GuideStepOutput, HelpBody, HelpResponse, OutputType,
    ScoredCategory, SkillSummary, WorkflowSummary,
};
use htkit_search::{
    classify_and_recommend, CategoryScore, CategoryTable, Guide, Intent, Recommendation,
};

/// Search results shown to the user.
pub const MAX_SEARCH_RESULTS: usize = 10;
/// Skill descriptions are cut to this many characters in search results.
pub const SKILL_SNIPPET_CHARS: usize = 80;

/// Classify `input` against the catalog and table and assemble the response.
#[must_use]
pub fn build_help_response(input: &str, catalog: &Catalog, table: &CategoryTable) -> HelpResponse {
    let input = input.trim();
    let intent = classify_and_recommend(input, catalog.workflow_names(), table);

    match intent {
        Intent::Overview => HelpResponse::new(
            OutputType::CategoryGuide,
            input,
            HelpBody::Overview {
                workflows: catalog.workflows.iter().map(workflow_summary).collect(),
                skills: catalog.skills.iter().map(skill_summary).collect(),
            },
        ),
        Intent::Category { name } => HelpResponse::new(
            OutputType::CategoryGuide,
            input,
            HelpBody::Category {
                guide: table.guide(&name).map(|g| guide_output(&name, g)),
                name,
                available: available_keys(table),
            },
        ),
        Intent::Task { recommendation } => HelpResponse::new(
            OutputType::TaskRecommendations,
            input,
            task_body(input, &recommendation, table),
        ),
        Intent::Search { term } => {
            let matches = catalog.search(&term);
            HelpResponse::new(
                OutputType::SearchResults,
                input,
                HelpBody::Search {
                    total: matches.len(),
                    matches: matches
                        .into_iter()
                        .take(MAX_SEARCH_RESULTS)
                        .map(catalog_hit)
                        .collect(),
                    term,
                    available: available_keys(table),
                },
            )
        }
    }
}

fn task_body(task: &str, recommendation: &Recommendation, table: &CategoryTable) -> HelpBody {
    let scored = |s: &CategoryScore| ScoredCategory {
        category: s.category.clone(),
        score: s.score,
        title: table.guide(&s.category).map(|g| g.title.clone()),
    };

    let recommended = recommendation.top().map(scored);
    let guide = recommendation
        .top()
        .and_then(|top| table.guide(&top.category).map(|g| guide_output(&top.category, g)));
    let alternatives = if recommendation.ambiguous {
        Vec::new()
    } else {
        recommendation.alternatives().iter().map(scored).collect()
    };

    HelpBody::Task {
        task: task.to_string(),
        ambiguous: recommendation.ambiguous,
        recommended,
        guide,
        alternatives,
        candidates: recommendation.candidates().iter().map(scored).collect(),
        available: available_keys(table),
    }
}

fn guide_output(key: &str, guide: &Guide) -> GuideOutput {
    GuideOutput {
        key: key.to_string(),
        title: guide.title.clone(),
        steps: guide
            .steps
            .iter()
            .map(|step| GuideStepOutput {
                label: step.label.clone(),
                command: step.command.clone(),
            })
            .collect(),
        tip: guide.tip.clone(),
    }
}

fn available_keys(table: &CategoryTable) -> Vec<String> {
    let mut keys: Vec<String> = table.keys().map(str::to_string).collect();
    keys.sort();
    keys
}

fn workflow_summary(wf: &Workflow) -> WorkflowSummary {
    WorkflowSummary {
        name: wf.name.clone(),
        description: wf.description.clone(),
        power_level: wf.power_level,
    }
}

fn skill_summary(sk: &Skill) -> SkillSummary {
    SkillSummary {
        name: sk.name.clone(),
        description: sk.description.clone(),
        has_scripts: sk.has_scripts,
        has_references: sk.has_references,
    }
}

fn catalog_hit(hit: CatalogMatch) -> CatalogHit {
    match hit.kind {
        EntryKind::Workflow => CatalogHit {
            kind: CatalogKind::Workflow,
            name: hit.name,
            description: hit.description,
        },
        EntryKind::Skill => CatalogHit {
            kind: CatalogKind::Skill,
            name: hit.name,
            description: hit.description.chars().take(SKILL_SNIPPET_CHARS).collect(),
        },
    }
}
