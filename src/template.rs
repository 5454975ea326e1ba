//! `{{TOKEN}}` placeholder filling and HTML text helpers

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::{Result, TemplateError};

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("Valid regex pattern"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("Valid regex pattern"));

const ENTITIES: &[(char, &str)] = &[
    ('✓', "&#10004;"),
    ('→', "&rarr;"),
    ('—', "&mdash;"),
    ('•', "&bull;"),
    ('·', "&middot;"),
    ('☆', "&#9734;"),
];

/// Token values for an HTML template
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    values: BTreeMap<String, String>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, token: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(token.into(), value.to_string());
        self
    }

    pub fn with(mut self, token: impl Into<String>, value: impl ToString) -> Self {
        self.set(token, value);
        self
    }

    /// Substitute every known token; unknown tokens stay in the output
    pub fn apply(&self, template: &str) -> String {
        TOKEN
            .replace_all(template, |caps: &regex::Captures<'_>| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Substitute and fail when any token is left over
    pub fn apply_strict(&self, template: &str) -> Result<String> {
        let filled = self.apply(template);
        let tokens = leftover_tokens(&filled);
        if tokens.is_empty() {
            Ok(filled)
        } else {
            Err(TemplateError::Unreplaced { tokens }.into())
        }
    }
}

/// Distinct `{{TOKEN}}` names still present in `text`, in order of appearance
pub fn leftover_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for caps in TOKEN.captures_iter(text) {
        let token = caps[0].to_string();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Replace the symbols used in copy with HTML entities
pub fn to_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ENTITIES.iter().find(|(symbol, _)| *symbol == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Escape text for HTML element content and attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text left after removing tags
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Characters of visible text, the measure marketplaces limit
pub fn text_char_count(html: &str) -> usize {
    strip_tags(html).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_tokens() {
        let r = Replacements::new()
            .with("RACE_NAME", "Unbound 200")
            .with("WEEKS", 12);
        assert_eq!(
            r.apply("<h1>{{RACE_NAME}}</h1><p>{{WEEKS}} weeks {{MISSING}}</p>"),
            "<h1>Unbound 200</h1><p>12 weeks {{MISSING}}</p>"
        );
    }

    #[test]
    fn test_strict_reports_leftovers() {
        let r = Replacements::new().with("A", "x");
        let err = r.apply_strict("{{A}} {{B}} {{C}} {{B}}").unwrap_err();
        assert!(err.to_string().contains("{{B}}, {{C}}"));
        assert_eq!(r.apply_strict("{{A}}").unwrap(), "x");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let r = Replacements::new().with("A", "{{B}}").with("B", "y");
        assert_eq!(r.apply("{{A}}"), "{{B}}");
    }

    #[test]
    fn test_entities() {
        assert_eq!(
            to_html_entities("✓ Heat → Fuel — done • a · b ☆"),
            "&#10004; Heat &rarr; Fuel &mdash; done &bull; a &middot; b &#9734;"
        );
    }

    #[test]
    fn test_text_char_count() {
        assert_eq!(text_char_count("<p style=\"x\">Hello</p> <b>wé</b>"), 8);
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
