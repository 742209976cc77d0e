//! Workflow and skill catalog discovery for an `.agent/` directory.
//!
//! ```text
//! .agent/
//!   workflows/<name>.md        frontmatter `description`, `⚡` power marks
//!   skills/<name>/SKILL.md     frontmatter `description`
//!   skills/<name>/scripts/     optional
//!   skills/<name>/references/  optional
//! ```

mod discovery;
mod error;
mod frontmatter;
mod search;

pub use discovery::{discover_skills, discover_workflows, Skill, Workflow};
pub use error::{CatalogError, Result};
pub use frontmatter::parse_frontmatter;
pub use search::{search_catalog, CatalogMatch, EntryKind};

use std::path::{Path, PathBuf};

/// Discovered workflows and skills under one agent directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub workflows: Vec<Workflow>,
    pub skills: Vec<Skill>,
}

impl Catalog {
    /// Scan `<agent_dir>/workflows` and `<agent_dir>/skills`.
    pub fn discover(agent_dir: &Path) -> Result<Self> {
        Ok(Self {
            workflows: discover_workflows(&workflows_dir(agent_dir))?,
            skills: discover_skills(&skills_dir(agent_dir))?,
        })
    }

    /// Workflow names without the leading slash.
    pub fn workflow_names(&self) -> impl Iterator<Item = &str> {
        self.workflows.iter().map(Workflow::bare_name)
    }

    #[must_use]
    pub fn search(&self, term: &str) -> Vec<CatalogMatch> {
        search_catalog(term, &self.workflows, &self.skills)
    }
}

#[must_use]
pub fn workflows_dir(agent_dir: &Path) -> PathBuf {
    agent_dir.join("workflows")
}

#[must_use]
pub fn skills_dir(agent_dir: &Path) -> PathBuf {
    agent_dir.join("skills")
}
