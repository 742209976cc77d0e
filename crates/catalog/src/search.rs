use serde::{Deserialize, Serialize};

use crate::discovery::{Skill, Workflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Workflow,
    Skill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub kind: EntryKind,
    pub name: String,
    pub description: String,
}

/// Case-insensitive substring search over names and descriptions.
///
/// Workflows come before skills, each in catalog order. Every match is
/// returned; callers decide how many to show.
#[must_use]
pub fn search_catalog(term: &str, workflows: &[Workflow], skills: &[Skill]) -> Vec<CatalogMatch> {
    let needle = term.trim().to_lowercase();
    let hit = |name: &str, description: &str| {
        name.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
    };

    let workflow_hits = workflows
        .iter()
        .filter(|wf| hit(&wf.name, &wf.description))
        .map(|wf| CatalogMatch {
            kind: EntryKind::Workflow,
            name: wf.name.clone(),
            description: wf.description.clone(),
        });
    let skill_hits = skills
        .iter()
        .filter(|sk| hit(&sk.name, &sk.description))
        .map(|sk| CatalogMatch {
            kind: EntryKind::Skill,
            name: sk.name.clone(),
            description: sk.description.clone(),
        });

    workflow_hits.chain(skill_hits).collect()
}
