use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::error::{CatalogError, Result};
use crate::frontmatter::parse_frontmatter;

const POWER_MARK: char = '⚡';
const SKILL_FILE: &str = "SKILL.md";
const SKILL_DESCRIPTION_CHARS: usize = 120;

/// A slash command backed by `<workflows>/<name>.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// `/` followed by the file stem.
    pub name: String,
    pub description: String,
    /// Number of `⚡` marks in the raw description.
    pub power_level: usize,
    pub filename: String,
}

impl Workflow {
    /// Name without the leading slash.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches('/')
    }
}

/// A skill directory containing `SKILL.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub has_scripts: bool,
    pub has_references: bool,
}

/// Workflows in `dir`, sorted by file name. Files without a frontmatter
/// `description` are skipped; a missing directory is an empty catalog.
pub fn discover_workflows(dir: &Path) -> Result<Vec<Workflow>> {
    let mut workflows = Vec::new();
    for entry in list_dir(dir)? {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md")
        {
            continue;
        }

        let Some(content) = read_markdown(path) else {
            continue;
        };
        let fields = parse_frontmatter(&content);
        let Some(raw) = fields.get("description").filter(|d| !d.is_empty()) else {
            log::debug!("Skipping workflow without description {}", path.display());
            continue;
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        workflows.push(Workflow {
            name: format!("/{stem}"),
            description: raw
                .trim_start_matches(|c: char| c == POWER_MARK || c.is_whitespace())
                .trim()
                .to_string(),
            power_level: raw.chars().filter(|c| *c == POWER_MARK).count(),
            filename: entry.file_name().to_string_lossy().into_owned(),
        });
    }

    log::info!("Found {} workflows in {}", workflows.len(), dir.display());
    Ok(workflows)
}

/// Skills under `dir`, one per sub-directory holding `SKILL.md`, sorted by name.
pub fn discover_skills(dir: &Path) -> Result<Vec<Skill>> {
    let mut skills = Vec::new();
    for entry in list_dir(dir)? {
        if !entry.file_type().is_dir() {
            continue;
        }
        let skill_dir = entry.path();
        let skill_md = skill_dir.join(SKILL_FILE);
        if !skill_md.is_file() {
            continue;
        }

        let description = read_markdown(&skill_md)
            .map(|content| parse_frontmatter(&content))
            .and_then(|mut fields| fields.remove("description"))
            .unwrap_or_default();

        skills.push(Skill {
            name: entry.file_name().to_string_lossy().into_owned(),
            description: description.chars().take(SKILL_DESCRIPTION_CHARS).collect(),
            has_scripts: skill_dir.join("scripts").exists(),
            has_references: skill_dir.join("references").exists(),
        });
    }

    log::info!("Found {} skills in {}", skills.len(), dir.display());
    Ok(skills)
}

fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    if !dir.is_dir() {
        log::debug!("Catalog directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for result in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match result {
            Ok(entry) => entries.push(entry),
            Err(err) if err.depth() == 0 => {
                return Err(CatalogError::Scan {
                    path: dir.to_path_buf(),
                    source: err,
                })
            }
            Err(err) => log::warn!("Failed to read entry: {err}"),
        }
    }
    Ok(entries)
}

fn read_markdown(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            log::warn!("Failed to read {}: {err}", path.display());
            None
        }
    }
}
