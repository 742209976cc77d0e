use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const RESPONSE_SCHEMA_VERSION: u32 = 1;

/// Presentation hint emitted ahead of every `ht-help` response.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    CategoryGuide,
    SearchResults,
    TaskRecommendations,
}

impl OutputType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CategoryGuide => "category-guide",
            Self::SearchResults => "search-results",
            Self::TaskRecommendations => "task-recommendations",
        }
    }

    /// The `@HT_OUTPUT_TYPE:<type>` marker line.
    #[must_use]
    pub fn marker(self) -> String {
        format!("@HT_OUTPUT_TYPE:{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct GuideStepOutput {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct GuideOutput {
    pub key: String,
    pub title: String,
    pub steps: Vec<GuideStepOutput>,
    pub tip: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ScoredCategory {
    pub category: String,
    pub score: f64,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct WorkflowSummary {
    pub name: String,
    pub description: String,
    pub power_level: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct SkillSummary {
    pub name: String,
    pub description: String,
    pub has_scripts: bool,
    pub has_references: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Workflow,
    Skill,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CatalogHit {
    pub kind: CatalogKind,
    pub name: String,
    pub description: String,
}

/// Intent-specific payload of a [`HelpResponse`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum HelpBody {
    Overview {
        workflows: Vec<WorkflowSummary>,
        skills: Vec<SkillSummary>,
    },
    Category {
        name: String,
        guide: Option<GuideOutput>,
        /// Category keys offered when `guide` is missing.
        available: Vec<String>,
    },
    Task {
        task: String,
        ambiguous: bool,
        recommended: Option<ScoredCategory>,
        guide: Option<GuideOutput>,
        alternatives: Vec<ScoredCategory>,
        candidates: Vec<ScoredCategory>,
        available: Vec<String>,
    },
    Search {
        term: String,
        total: usize,
        matches: Vec<CatalogHit>,
        available: Vec<String>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct HelpResponse {
    pub schema_version: u32,
    pub output_type: OutputType,
    pub input: String,
    pub body: HelpBody,
}

impl HelpResponse {
    #[must_use]
    pub fn new(output_type: OutputType, input: impl Into<String>, body: HelpBody) -> Self {
        Self {
            schema_version: RESPONSE_SCHEMA_VERSION,
            output_type,
            input: input.into(),
            body,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct TableColumn {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct TableRow {
    pub score: f64,
    pub columns: Vec<TableColumn>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct TableSearchResponse {
    pub schema_version: u32,
    pub domain: String,
    pub query: String,
    pub file: String,
    pub count: usize,
    pub matched_terms: Vec<String>,
    pub results: Vec<TableRow>,
}

/// One query run against every configured domain, in config order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct MultiTableSearchResponse {
    pub schema_version: u32,
    pub query: String,
    /// Sum of `count` over all domains.
    pub total: usize,
    pub domains: Vec<TableSearchResponse>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON schema of [`HelpResponse`].
pub fn help_response_schema() -> Result<String> {
    serialize_json_pretty(&schemars::schema_for!(HelpResponse))
}
