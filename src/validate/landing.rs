//! Elementor export checks: every landing section has a widget to land in

use serde_json::Value;
use std::path::Path;

use super::{Finding, ValidationReport};
use crate::error::Result;
use crate::landing::LandingSection;

fn collect_html<'a>(elements: &'a [Value], out: &mut Vec<&'a str>) {
    for element in elements {
        if element.get("widgetType").and_then(Value::as_str) == Some("html") {
            if let Some(html) = element
                .get("settings")
                .and_then(|s| s.get("html"))
                .and_then(Value::as_str)
            {
                out.push(html);
            }
        }
        if let Some(children) = element.get("elements").and_then(Value::as_array) {
            collect_html(children, out);
        }
    }
}

fn has_element_id(elements: &[Value], id: &str) -> bool {
    elements.iter().any(|element| {
        element
            .get("settings")
            .and_then(|s| s.get("_element_id"))
            .and_then(Value::as_str)
            == Some(id)
            || element
                .get("elements")
                .and_then(Value::as_array)
                .is_some_and(|children| has_element_id(children, id))
    })
}

pub fn check_elementor(subject: &str, document: &Value) -> Vec<Finding> {
    let Some(content) = document.get("content").and_then(Value::as_array) else {
        return vec![Finding::error(
            "structure",
            subject,
            "export has no content array",
        )];
    };

    let mut widgets = Vec::new();
    collect_html(content, &mut widgets);

    LandingSection::ALL
        .iter()
        .filter(|section| {
            let by_marker = widgets.iter().any(|html| html.contains(section.marker()));
            let by_id = section.element_id().is_some_and(|id| has_element_id(content, id));
            !(by_marker || by_id)
        })
        .map(|section| {
            Finding::warning(
                "missing_widget",
                subject,
                format!("no widget for the {} section", section.label()),
            )
        })
        .collect()
}

pub fn validate_elementor_file(path: &Path) -> Result<ValidationReport> {
    let document: Value = crate::models::load_json(path)?;
    let subject = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("elementor")
        .to_string();
    let mut report = ValidationReport::new();
    report.record(check_elementor(&subject, &document));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_sections_are_warnings() {
        let doc = json!({"content": [{"elements": [
            {"widgetType": "html", "settings": {"html": "<div class=\"gg-hero-inner\"></div>"}},
            {"widgetType": "html", "settings": {"_element_id": "vitals", "html": ""}}
        ]}]});
        let findings = check_elementor("page.json", &doc);
        assert_eq!(findings.len(), LandingSection::ALL.len() - 2);
        assert!(findings.iter().all(|f| f.category == "missing_widget"));
        assert!(!findings.iter().any(|f| f.message == "no widget for the hero section"));
    }

    #[test]
    fn test_not_an_export() {
        let findings = check_elementor("page.json", &json!({"title": "x"}));
        assert_eq!(findings[0].category, "structure");
        assert_eq!(findings[0].severity, crate::validate::Severity::Error);
    }
}
