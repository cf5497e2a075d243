//! Template and category types for project documents

use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document type discriminant
///
/// Every project document is created from exactly one template type, and the
/// type selects both the default content and the typed content shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    // Core
    ProjectCharter,
    ProjectPlan,
    RiskRegister,
    StatusReport,
    IssueLog,
    DecisionLog,
    // Lifecycle
    RequirementsDocument,
    StakeholderRegister,
    ChangeRequest,
    LessonsLearned,
    ClosureReport,
    // AI-specific
    AiUseCaseAssessment,
    DataInventory,
    ModelCard,
    AiRiskAssessment,
    EvaluationPlan,
}

impl TemplateType {
    /// All template types in registration order
    pub const ALL: [TemplateType; 16] = [
        TemplateType::ProjectCharter,
        TemplateType::ProjectPlan,
        TemplateType::RiskRegister,
        TemplateType::StatusReport,
        TemplateType::IssueLog,
        TemplateType::DecisionLog,
        TemplateType::RequirementsDocument,
        TemplateType::StakeholderRegister,
        TemplateType::ChangeRequest,
        TemplateType::LessonsLearned,
        TemplateType::ClosureReport,
        TemplateType::AiUseCaseAssessment,
        TemplateType::DataInventory,
        TemplateType::ModelCard,
        TemplateType::AiRiskAssessment,
        TemplateType::EvaluationPlan,
    ];

    /// Wire name of the type (e.g. `PROJECT_PLAN`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::ProjectCharter => "PROJECT_CHARTER",
            TemplateType::ProjectPlan => "PROJECT_PLAN",
            TemplateType::RiskRegister => "RISK_REGISTER",
            TemplateType::StatusReport => "STATUS_REPORT",
            TemplateType::IssueLog => "ISSUE_LOG",
            TemplateType::DecisionLog => "DECISION_LOG",
            TemplateType::RequirementsDocument => "REQUIREMENTS_DOCUMENT",
            TemplateType::StakeholderRegister => "STAKEHOLDER_REGISTER",
            TemplateType::ChangeRequest => "CHANGE_REQUEST",
            TemplateType::LessonsLearned => "LESSONS_LEARNED",
            TemplateType::ClosureReport => "CLOSURE_REPORT",
            TemplateType::AiUseCaseAssessment => "AI_USE_CASE_ASSESSMENT",
            TemplateType::DataInventory => "DATA_INVENTORY",
            TemplateType::ModelCard => "MODEL_CARD",
            TemplateType::AiRiskAssessment => "AI_RISK_ASSESSMENT",
            TemplateType::EvaluationPlan => "EVALUATION_PLAN",
        }
    }

    /// Category the type belongs to
    pub fn category(&self) -> DocumentCategory {
        match self {
            TemplateType::ProjectCharter
            | TemplateType::ProjectPlan
            | TemplateType::RiskRegister
            | TemplateType::StatusReport
            | TemplateType::IssueLog
            | TemplateType::DecisionLog => DocumentCategory::Core,
            TemplateType::RequirementsDocument
            | TemplateType::StakeholderRegister
            | TemplateType::ChangeRequest
            | TemplateType::LessonsLearned
            | TemplateType::ClosureReport => DocumentCategory::Lifecycle,
            TemplateType::AiUseCaseAssessment
            | TemplateType::DataInventory
            | TemplateType::ModelCard
            | TemplateType::AiRiskAssessment
            | TemplateType::EvaluationPlan => DocumentCategory::AiSpecific,
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        TemplateType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TemplateError::UnknownType(s.to_string()))
    }
}

/// Grouping of template types
///
/// Declaration order is the sort order used when listing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    Core,
    Lifecycle,
    AiSpecific,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 3] = [
        DocumentCategory::Core,
        DocumentCategory::Lifecycle,
        DocumentCategory::AiSpecific,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Core => "CORE",
            DocumentCategory::Lifecycle => "LIFECYCLE",
            DocumentCategory::AiSpecific => "AI_SPECIFIC",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Core => "Core Project Documents",
            DocumentCategory::Lifecycle => "Lifecycle Documents",
            DocumentCategory::AiSpecific => "AI-Specific Documents",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        DocumentCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TemplateError::UnknownCategory(s.to_string()))
    }
}

/// A catalogue entry describing one document type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    #[serde(rename = "type")]
    pub template_type: TemplateType,

    /// Human-readable name
    pub name: &'static str,

    pub description: &'static str,

    pub category: DocumentCategory,

    /// Content a new document starts with when none is supplied
    pub default_content: serde_json::Value,
}

impl DocumentTemplate {
    /// Summary of this template without its default content
    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            template_type: self.template_type,
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category,
            category_label: self.category.label().to_string(),
        }
    }
}

/// Template summary for listing endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub name: String,
    pub description: String,
    pub category: DocumentCategory,
    pub category_label: String,
}

/// Category summary with the template types it groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub category: DocumentCategory,
    pub label: String,
    pub template_types: Vec<TemplateType>,
}
