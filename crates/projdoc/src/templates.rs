//! The compiled-in template catalogue
//!
//! The catalogue is built once and never mutated. Default content is always
//! handed out as a fresh clone, so callers are free to modify what they get.

use crate::content::DocumentContent;
use crate::error::{Result, TemplateError};
use crate::template::{CategoryInfo, DocumentCategory, DocumentTemplate, TemplateInfo, TemplateType};
use once_cell::sync::Lazy;
use serde_json::Value;

static CATALOGUE: Lazy<Vec<DocumentTemplate>> = Lazy::new(|| {
    TemplateType::ALL
        .into_iter()
        .map(|template_type| {
            let (name, description) = describe(template_type);
            DocumentTemplate {
                template_type,
                name,
                description,
                category: template_type.category(),
                default_content: DocumentContent::default_for(template_type).to_value(),
            }
        })
        .collect()
});

fn describe(template_type: TemplateType) -> (&'static str, &'static str) {
    match template_type {
        TemplateType::ProjectCharter => (
            "Project Charter",
            "Formal authorization of the project with objectives, scope and sponsor",
        ),
        TemplateType::ProjectPlan => (
            "Project Plan",
            "Phases, milestones, resources and constraints for delivery",
        ),
        TemplateType::RiskRegister => (
            "Risk Register",
            "Identified risks with likelihood, impact, owner and mitigation",
        ),
        TemplateType::StatusReport => (
            "Status Report",
            "Periodic summary of health, progress and blockers",
        ),
        TemplateType::IssueLog => ("Issue Log", "Open and resolved project issues"),
        TemplateType::DecisionLog => (
            "Decision Log",
            "Record of key decisions and their rationale",
        ),
        TemplateType::RequirementsDocument => (
            "Requirements Document",
            "Functional and non-functional requirements with acceptance criteria",
        ),
        TemplateType::StakeholderRegister => (
            "Stakeholder Register",
            "Stakeholders with influence, interest and engagement strategy",
        ),
        TemplateType::ChangeRequest => (
            "Change Request",
            "Proposed change with justification and impact analysis",
        ),
        TemplateType::LessonsLearned => (
            "Lessons Learned",
            "What went well, what to improve and recommendations",
        ),
        TemplateType::ClosureReport => (
            "Closure Report",
            "Final outcomes, outstanding items and sign-off",
        ),
        TemplateType::AiUseCaseAssessment => (
            "AI Use Case Assessment",
            "Problem framing, feasibility and data needs for an AI use case",
        ),
        TemplateType::DataInventory => (
            "Data Inventory",
            "Datasets used by the project with ownership and retention",
        ),
        TemplateType::ModelCard => (
            "Model Card",
            "Intended use, limitations and evaluation metrics of a model",
        ),
        TemplateType::AiRiskAssessment => (
            "AI Risk Assessment",
            "AI-specific risks, bias considerations and human oversight",
        ),
        TemplateType::EvaluationPlan => (
            "Evaluation Plan",
            "Objectives, metrics and datasets for evaluating a model",
        ),
    }
}

/// Look up the template registered for a type
pub fn get_template(template_type: TemplateType) -> Option<&'static DocumentTemplate> {
    CATALOGUE.iter().find(|t| t.template_type == template_type)
}

/// Look up a template by its wire name (e.g. `RISK_REGISTER`)
pub fn get_template_by_name(name: &str) -> Result<&'static DocumentTemplate> {
    let template_type: TemplateType = name.parse()?;
    get_template(template_type).ok_or_else(|| TemplateError::UnknownType(name.to_string()))
}

/// Independent copy of a template's default content
pub fn get_default_content(template_type: TemplateType) -> Value {
    get_template(template_type)
        .map(|t| t.default_content.clone())
        .unwrap_or_else(|| DocumentContent::default_for(template_type).to_value())
}

/// Independent copy of the default content for a type given by wire name
pub fn get_default_content_for(name: &str) -> Result<Value> {
    get_template_by_name(name).map(|t| t.default_content.clone())
}

/// Category of a type given by wire name
pub fn get_category_for_type(name: &str) -> Result<DocumentCategory> {
    get_template_by_name(name).map(|t| t.category)
}

/// Info for every template, grouped core, lifecycle, AI-specific
pub fn list_all_template_info() -> Vec<TemplateInfo> {
    DocumentCategory::ALL
        .into_iter()
        .flat_map(|category| {
            CATALOGUE
                .iter()
                .filter(move |t| t.category == category)
                .map(DocumentTemplate::info)
        })
        .collect()
}

/// Categories with the template types registered under each
pub fn list_categories() -> Vec<CategoryInfo> {
    DocumentCategory::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            category,
            label: category.label().to_string(),
            template_types: CATALOGUE
                .iter()
                .filter(|t| t.category == category)
                .map(|t| t.template_type)
                .collect(),
        })
        .collect()
}
