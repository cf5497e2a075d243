//! Typed content shapes for project documents
//!
//! Each template type has one content struct. Stored document content stays
//! free-form JSON; these shapes are used to build template defaults and to
//! check a payload against the shape of its template type.

use crate::error::{Result, TemplateError};
use crate::template::TemplateType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generates the `DocumentContent` sum type and its per-type dispatch
macro_rules! content_shapes {
    ($($variant:ident($shape:ident)),+ $(,)?) => {
        /// Content of a project document, one variant per template type
        #[derive(Debug, Clone, PartialEq)]
        pub enum DocumentContent {
            $($variant($shape),)+
        }

        impl DocumentContent {
            /// Template type this content belongs to
            pub fn template_type(&self) -> TemplateType {
                match self {
                    $(DocumentContent::$variant(_) => TemplateType::$variant,)+
                }
            }

            /// Parse a JSON payload as the content shape of `template_type`
            pub fn parse(template_type: TemplateType, value: &Value) -> Result<Self> {
                if !value.is_object() {
                    return Err(TemplateError::InvalidContent {
                        template_type: template_type.to_string(),
                        reason: "content must be a JSON object".to_string(),
                    });
                }
                let invalid = |e: serde_json::Error| TemplateError::InvalidContent {
                    template_type: template_type.to_string(),
                    reason: e.to_string(),
                };
                match template_type {
                    $(TemplateType::$variant => serde_json::from_value::<$shape>(value.clone())
                        .map(DocumentContent::$variant)
                        .map_err(invalid),)+
                }
            }

            /// Serialize the inner shape to plain JSON (no variant tag)
            pub fn to_value(&self) -> Value {
                let value = match self {
                    $(DocumentContent::$variant(c) => serde_json::to_value(c),)+
                };
                value.unwrap_or(Value::Null)
            }
        }
    };
}

content_shapes! {
    ProjectCharter(ProjectCharter),
    ProjectPlan(ProjectPlan),
    RiskRegister(RiskRegister),
    StatusReport(StatusReport),
    IssueLog(IssueLog),
    DecisionLog(DecisionLog),
    RequirementsDocument(RequirementsDocument),
    StakeholderRegister(StakeholderRegister),
    ChangeRequest(ChangeRequest),
    LessonsLearned(LessonsLearned),
    ClosureReport(ClosureReport),
    AiUseCaseAssessment(AiUseCaseAssessment),
    DataInventory(DataInventory),
    ModelCard(ModelCard),
    AiRiskAssessment(AiRiskAssessment),
    EvaluationPlan(EvaluationPlan),
}

impl DocumentContent {
    /// Default content for a template type
    pub fn default_for(template_type: TemplateType) -> Self {
        match template_type {
            TemplateType::ProjectCharter => DocumentContent::ProjectCharter(ProjectCharter::default()),
            TemplateType::ProjectPlan => DocumentContent::ProjectPlan(ProjectPlan::starter()),
            TemplateType::RiskRegister => DocumentContent::RiskRegister(RiskRegister::default()),
            TemplateType::StatusReport => DocumentContent::StatusReport(StatusReport::default()),
            TemplateType::IssueLog => DocumentContent::IssueLog(IssueLog::default()),
            TemplateType::DecisionLog => DocumentContent::DecisionLog(DecisionLog::default()),
            TemplateType::RequirementsDocument => {
                DocumentContent::RequirementsDocument(RequirementsDocument::default())
            }
            TemplateType::StakeholderRegister => {
                DocumentContent::StakeholderRegister(StakeholderRegister::default())
            }
            TemplateType::ChangeRequest => DocumentContent::ChangeRequest(ChangeRequest::default()),
            TemplateType::LessonsLearned => DocumentContent::LessonsLearned(LessonsLearned::default()),
            TemplateType::ClosureReport => DocumentContent::ClosureReport(ClosureReport::default()),
            TemplateType::AiUseCaseAssessment => {
                DocumentContent::AiUseCaseAssessment(AiUseCaseAssessment::default())
            }
            TemplateType::DataInventory => DocumentContent::DataInventory(DataInventory::default()),
            TemplateType::ModelCard => DocumentContent::ModelCard(ModelCard::default()),
            TemplateType::AiRiskAssessment => {
                DocumentContent::AiRiskAssessment(AiRiskAssessment::default())
            }
            TemplateType::EvaluationPlan => DocumentContent::EvaluationPlan(EvaluationPlan::default()),
        }
    }

    /// Top-level keys of `value` that the shape of `template_type` does not know
    pub fn unknown_keys(template_type: TemplateType, value: &Value) -> Vec<String> {
        let known = Self::default_for(template_type).to_value();
        match (value.as_object(), known.as_object()) {
            (Some(given), Some(known)) => given
                .keys()
                .filter(|k| !known.contains_key(*k))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Qualitative rating used across risk and health fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Traffic-light health indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Health {
    #[default]
    Green,
    Amber,
    Red,
}

// === Core ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectCharter {
    pub purpose: String,
    pub objectives: Vec<String>,
    pub scope: Scope,
    pub sponsor: String,
    pub project_manager: String,
    pub success_criteria: Vec<String>,
    pub budget: Option<f64>,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scope {
    pub in_scope: Vec<String>,
    pub out_of_scope: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,
    pub due_date: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPlan {
    pub overview: String,
    pub phases: Vec<Phase>,
    pub milestones: Vec<Milestone>,
    pub resources: Vec<String>,
    pub assumptions: Vec<String>,
    pub constraints: Vec<String>,
}

impl ProjectPlan {
    /// Plan skeleton with the usual delivery phases
    pub fn starter() -> Self {
        let phase = |name: &str| Phase {
            name: name.to_string(),
            ..Phase::default()
        };
        Self {
            phases: vec![
                phase("Initiation"),
                phase("Planning"),
                phase("Execution"),
                phase("Closure"),
            ],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskRegister {
    pub risks: Vec<RiskEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskEntry {
    pub id: String,
    pub description: String,
    pub likelihood: Rating,
    pub impact: Rating,
    pub owner: String,
    pub mitigation: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusReport {
    pub reporting_period: String,
    pub overall_health: Health,
    pub summary: String,
    pub accomplishments: Vec<String>,
    pub next_steps: Vec<String>,
    pub blockers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueLog {
    pub issues: Vec<IssueEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueEntry {
    pub id: String,
    pub title: String,
    pub priority: Rating,
    pub owner: String,
    pub raised_on: Option<String>,
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecisionLog {
    pub decisions: Vec<DecisionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecisionEntry {
    pub id: String,
    pub decision: String,
    pub rationale: String,
    pub decided_by: String,
    pub decided_on: Option<String>,
}

// === Lifecycle ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementsDocument {
    pub introduction: String,
    pub functional: Vec<Requirement>,
    pub non_functional: Vec<Requirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Requirement {
    pub id: String,
    pub description: String,
    pub priority: Rating,
    pub acceptance_criteria: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StakeholderRegister {
    pub stakeholders: Vec<Stakeholder>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stakeholder {
    pub name: String,
    pub role: String,
    pub influence: Rating,
    pub interest: Rating,
    pub engagement_strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeRequest {
    pub title: String,
    pub requested_by: String,
    pub description: String,
    pub justification: String,
    pub impact: ChangeImpact,
    pub decision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeImpact {
    pub scope: String,
    pub schedule: String,
    pub cost: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonsLearned {
    pub went_well: Vec<String>,
    pub to_improve: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClosureReport {
    pub summary: String,
    pub objectives_met: Vec<String>,
    pub outstanding_items: Vec<String>,
    pub final_budget: Option<f64>,
    pub sign_off: Vec<String>,
}

// === AI-specific ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiUseCaseAssessment {
    pub problem_statement: String,
    pub proposed_solution: String,
    pub expected_benefits: Vec<String>,
    pub feasibility: Rating,
    pub data_requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataInventory {
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub name: String,
    pub source: String,
    pub owner: String,
    pub contains_personal_data: bool,
    pub retention: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelCard {
    pub model_name: String,
    pub version: String,
    pub intended_use: String,
    pub limitations: Vec<String>,
    pub training_data: String,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metric {
    pub name: String,
    pub value: Option<f64>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiRiskAssessment {
    pub risk_level: Rating,
    pub risks: Vec<RiskEntry>,
    pub human_oversight: String,
    pub bias_considerations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluationPlan {
    pub objectives: Vec<String>,
    pub metrics: Vec<Metric>,
    pub test_datasets: Vec<String>,
    pub acceptance_criteria: Vec<String>,
}
