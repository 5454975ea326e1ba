//! Splicing rendered sections into an Elementor page export
//!
//! An export is a JSON document whose `content` array holds nested
//! `elements`. HTML widgets carry their markup in `settings.html`; widgets
//! may also be tagged with `settings._element_id`.

use serde_json::Value;

/// Find the first HTML widget whose markup contains `pattern`
pub fn find_widget_by_content<'a>(elements: &'a mut [Value], pattern: &str) -> Option<&'a mut Value> {
    for element in elements.iter_mut() {
        let matches = element.get("widgetType").and_then(Value::as_str) == Some("html")
            && element
                .get("settings")
                .and_then(|s| s.get("html"))
                .and_then(Value::as_str)
                .is_some_and(|html| html.contains(pattern));
        if matches {
            return Some(element);
        }
        if let Some(children) = element.get_mut("elements").and_then(Value::as_array_mut) {
            if let Some(found) = find_widget_by_content(children, pattern) {
                return Some(found);
            }
        }
    }
    None
}

/// Find the first element tagged with `settings._element_id == id`
pub fn find_widget_by_element_id<'a>(elements: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    for element in elements.iter_mut() {
        let matches = element
            .get("settings")
            .and_then(|s| s.get("_element_id"))
            .and_then(Value::as_str)
            == Some(id);
        if matches {
            return Some(element);
        }
        if let Some(children) = element.get_mut("elements").and_then(Value::as_array_mut) {
            if let Some(found) = find_widget_by_element_id(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn set_html(widget: &mut Value, html: &str) -> bool {
    match widget.get_mut("settings").and_then(Value::as_object_mut) {
        Some(settings) => {
            settings.insert("html".to_string(), Value::String(html.to_string()));
            true
        }
        None => false,
    }
}

/// Replace a widget's markup, trying the element id before the content
/// pattern. Returns whether a widget was updated.
pub fn replace_widget_html(
    document: &mut Value,
    pattern: &str,
    html: &str,
    element_id: Option<&str>,
) -> bool {
    let Some(elements) = document.get_mut("content").and_then(Value::as_array_mut) else {
        return false;
    };

    if let Some(id) = element_id {
        if let Some(widget) = find_widget_by_element_id(elements, id) {
            if set_html(widget, html) {
                return true;
            }
        }
    }

    match find_widget_by_content(elements, pattern) {
        Some(widget) => set_html(widget, html),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "title": "Base",
            "content": [{
                "elType": "section",
                "elements": [{
                    "elType": "column",
                    "elements": [
                        {"widgetType": "html", "settings": {"html": "<div class=\"gg-hero-inner\">old</div>"}},
                        {"widgetType": "html", "settings": {"_element_id": "vitals", "html": "<p>stale</p>"}},
                        {"widgetType": "text-editor", "settings": {"editor": "gg-logistics-section"}}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_replace_by_content() {
        let mut doc = document();
        assert!(replace_widget_html(&mut doc, "gg-hero-inner", "<div>new</div>", None));
        assert_eq!(
            doc["content"][0]["elements"][0]["elements"][0]["settings"]["html"],
            "<div>new</div>"
        );
    }

    #[test]
    fn test_element_id_takes_precedence() {
        let mut doc = document();
        assert!(replace_widget_html(&mut doc, "id=\"race-vitals\"", "<table/>", Some("vitals")));
        assert_eq!(
            doc["content"][0]["elements"][0]["elements"][1]["settings"]["html"],
            "<table/>"
        );
    }

    #[test]
    fn test_only_html_widgets_match_content() {
        let mut doc = document();
        assert!(!replace_widget_html(&mut doc, "gg-logistics-section", "<x/>", Some("logistics")));
        assert!(!replace_widget_html(&mut json!({"title": "empty"}), "gg-hero-inner", "<x/>", None));
    }
}
