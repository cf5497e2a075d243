//! Document-related API models

use crate::error::{ApiError, FieldError, Result};
use crate::extract::Validate;
use crate::models::api::{check_content, check_description, check_name, check_version};
use projdoc::{DocumentCategory, TemplateType};
use projdoc_registry::{
    CloneDocument, CreateDocument, DocumentFilter, DocumentStatus, RestoreVersion, UpdateDocument,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Present-but-null becomes `Some(None)`; an absent key stays `None`
fn explicit_null<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request to create a document from a template
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub template_type: String,
    pub name: String,
    pub description: Option<String>,
    pub content: Option<Value>,
}

impl Validate for CreateDocumentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.template_type.parse::<TemplateType>().is_err() {
            errors.push(FieldError::new(
                "templateType",
                format!("unknown template type '{}'", self.template_type),
            ));
        }
        check_name("name", &self.name, &mut errors);
        check_description("description", self.description.as_deref(), &mut errors);
        check_content("content", self.content.as_ref(), &mut errors);
        errors
    }
}

impl CreateDocumentRequest {
    pub fn into_input(self) -> Result<CreateDocument> {
        let template_type = self
            .template_type
            .parse::<TemplateType>()
            .map_err(|e| ApiError::Registry(e.into()))?;

        Ok(CreateDocument {
            template_type,
            name: self.name.trim().to_string(),
            description: self.description,
            content: self.content,
        })
    }
}

/// Partial document update; content changes create a new version
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub name: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "explicit_null")]
    pub description: Option<Option<String>>,
    pub content: Option<Value>,
    pub status: Option<DocumentStatus>,
    pub expected_version: Option<i64>,
    pub change_log: Option<String>,
}

impl Validate for UpdateDocumentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name("name", name, &mut errors);
        }
        check_description(
            "description",
            self.description.as_ref().and_then(Option::as_deref),
            &mut errors,
        );
        check_content("content", self.content.as_ref(), &mut errors);
        check_version("expectedVersion", self.expected_version, &mut errors);
        errors
    }
}

impl From<UpdateDocumentRequest> for UpdateDocument {
    fn from(req: UpdateDocumentRequest) -> Self {
        UpdateDocument {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            content: req.content,
            status: req.status,
            expected_version: req.expected_version,
            change_log: req.change_log,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: DocumentStatus,
    pub expected_version: Option<i64>,
}

impl Validate for UpdateStatusRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_version("expectedVersion", self.expected_version, &mut errors);
        errors
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneDocumentRequest {
    pub name: Option<String>,
    pub target_project_id: Option<i64>,
}

impl Validate for CloneDocumentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name("name", name, &mut errors);
        }
        errors
    }
}

impl From<CloneDocumentRequest> for CloneDocument {
    fn from(req: CloneDocumentRequest) -> Self {
        CloneDocument {
            name: req.name.map(|n| n.trim().to_string()),
            target_project_id: req.target_project_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreVersionRequest {
    pub version: i64,
    pub expected_version: Option<i64>,
}

impl Validate for RestoreVersionRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_version("version", Some(self.version), &mut errors);
        check_version("expectedVersion", self.expected_version, &mut errors);
        errors
    }
}

impl From<RestoreVersionRequest> for RestoreVersion {
    fn from(req: RestoreVersionRequest) -> Self {
        RestoreVersion {
            version: req.version,
            expected_version: req.expected_version,
        }
    }
}

/// Query parameters for listing a project's documents
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    pub template_type: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl DocumentListQuery {
    /// Parse the raw query strings, reporting every bad field at once
    pub fn into_filter(self) -> Result<DocumentFilter> {
        let mut errors = Vec::new();

        let template_type = match self.template_type.as_deref() {
            None | Some("") => None,
            Some(raw) => raw
                .parse::<TemplateType>()
                .map_err(|e| errors.push(FieldError::new("templateType", e.to_string())))
                .ok(),
        };
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(raw) => raw
                .parse::<DocumentCategory>()
                .map_err(|e| errors.push(FieldError::new("category", e.to_string())))
                .ok(),
        };
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => raw
                .parse::<DocumentStatus>()
                .map_err(|e| errors.push(FieldError::new("status", e.to_string())))
                .ok(),
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(DocumentFilter {
            template_type,
            category,
            status,
            search: self.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_reports_each_bad_field() {
        let req: CreateDocumentRequest = serde_json::from_value(json!({
            "templateType": "BUDGET",
            "name": "",
            "content": "text"
        }))
        .unwrap();

        let fields: Vec<String> = req.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["templateType", "name", "content"]);
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateDocumentRequest = serde_json::from_value(json!({ "name": "Plan" })).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateDocumentRequest =
            serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateDocumentRequest =
            serde_json::from_value(json!({ "description": "Scope" })).unwrap();
        assert_eq!(set.description, Some(Some("Scope".to_string())));
    }

    #[test]
    fn test_list_query_parses_filters() {
        let query = DocumentListQuery {
            template_type: Some("RISK_REGISTER".to_string()),
            category: Some("CORE".to_string()),
            status: Some("IN_REVIEW".to_string()),
            search: Some("  ".to_string()),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.template_type, Some(TemplateType::RiskRegister));
        assert_eq!(filter.category, Some(DocumentCategory::Core));
        assert_eq!(filter.status, Some(DocumentStatus::InReview));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_list_query_rejects_unknown_values() {
        let query = DocumentListQuery {
            status: Some("DONE".to_string()),
            category: Some("MISC".to_string()),
            ..Default::default()
        };
        match query.into_filter() {
            Err(ApiError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
