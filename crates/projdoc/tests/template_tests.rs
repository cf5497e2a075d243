use pretty_assertions::assert_eq;
use projdoc::templates::{
    get_category_for_type, get_default_content, get_default_content_for, list_all_template_info,
    list_categories,
};
use projdoc::{DocumentCategory, TemplateError, TemplateType};
use serde_json::json;

#[test]
fn test_template_info_is_grouped_by_category() {
    let info = list_all_template_info();
    assert_eq!(info.len(), 16);

    let categories: Vec<DocumentCategory> = info.iter().map(|i| i.category).collect();
    let mut sorted = categories.clone();
    sorted.sort();
    assert_eq!(categories, sorted);

    assert_eq!(info[0].template_type, TemplateType::ProjectCharter);
    assert_eq!(info[0].category_label, "Core Project Documents");
    assert_eq!(info[15].template_type, TemplateType::EvaluationPlan);
    assert_eq!(info[15].category_label, "AI-Specific Documents");
}

#[test]
fn test_template_info_serializes_with_type_key() {
    let info = &list_all_template_info()[1];
    let value = serde_json::to_value(info).unwrap();
    assert_eq!(value["type"], json!("PROJECT_PLAN"));
    assert_eq!(value["categoryLabel"], json!("Core Project Documents"));
}

#[test]
fn test_default_content_is_an_independent_copy() {
    let mut first = get_default_content(TemplateType::ProjectPlan);
    let second = get_default_content(TemplateType::ProjectPlan);

    first["overview"] = json!("changed by caller");
    assert_eq!(second["overview"], json!(""));
    assert_eq!(
        get_default_content(TemplateType::ProjectPlan)["overview"],
        json!("")
    );
}

#[test]
fn test_project_plan_default_has_phases() {
    let content = get_default_content_for("PROJECT_PLAN").unwrap();
    let phases: Vec<&str> = content["phases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(phases, vec!["Initiation", "Planning", "Execution", "Closure"]);
}

#[test]
fn test_category_lookup() {
    assert_eq!(
        get_category_for_type("CHANGE_REQUEST").unwrap(),
        DocumentCategory::Lifecycle
    );
    assert!(get_category_for_type("change_request").is_err());
}

#[test]
fn test_categories_cover_every_type() {
    let categories = list_categories();
    assert_eq!(categories.len(), 3);
    let total: usize = categories.iter().map(|c| c.template_types.len()).sum();
    assert_eq!(total, TemplateType::ALL.len());
    assert_eq!(categories[1].label, "Lifecycle Documents");
}

#[test]
fn test_typed_and_named_lookups_agree() {
    for t in TemplateType::ALL {
        assert_eq!(get_default_content_for(t.as_str()).unwrap(), get_default_content(t));
        assert_eq!(get_category_for_type(t.as_str()).unwrap(), t.category());
    }
    assert!(matches!(
        get_default_content_for("BUDGET"),
        Err(TemplateError::UnknownType(name)) if name == "BUDGET"
    ));
}
