//! Training guide checks: self-contained styling, layout and section order

use once_cell::sync::Lazy;
use regex::Regex;

use super::Finding;

static SECTION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"id="section-(\d+)"#).expect("Valid regex pattern"));

static STYLESHEET_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<link[^>]+rel=["']?stylesheet"#).expect("Valid regex pattern")
});

const LAYOUT_CLASSES: [&str; 2] = ["gg-guide-layout", "gg-guide-toc"];

pub fn check_guide(subject: &str, html: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !html.contains("<style") {
        findings.push(Finding::error("styling", subject, "no embedded <style> block"));
    }
    if STYLESHEET_LINK.is_match(html) {
        findings.push(Finding::error(
            "styling",
            subject,
            "links an external stylesheet; guides must be self-contained",
        ));
    }

    for class in LAYOUT_CLASSES {
        if !html.contains(class) {
            findings.push(Finding::error("layout", subject, format!("missing {}", class)));
        }
    }

    let numbers: Vec<u32> = SECTION_ID
        .captures_iter(html)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    if numbers.is_empty() {
        findings.push(Finding::error("sections", subject, "no numbered sections"));
    } else if let Some(pos) = numbers.iter().enumerate().position(|(i, n)| *n as usize != i + 1) {
        findings.push(Finding::error(
            "sections",
            subject,
            format!(
                "section {} found where section {} was expected",
                numbers[pos],
                pos + 1
            ),
        ));
    }

    findings
}
