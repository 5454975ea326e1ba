//! Marketplace listing checks
//!
//! Run over the generated `marketplace_description.html` files. The plan
//! variant comes from the enclosing folder name.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use super::{collect_files, subject_for, Finding, ValidationReport};
use crate::config::ValidationSettings;
use crate::error::Result;
use crate::plans::{PlanLevel, PlanVariant};
use crate::template::{leftover_tokens, strip_tags, text_char_count};

pub const LISTING_FILE: &str = "marketplace_description.html";

static SECTION_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Ss]ection\s+\d+").expect("Valid regex pattern"));

static BEAT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"most (people|riders|athletes|plans)",
        r"generic plans",
        r"traditional training",
        r"random(ly)?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Valid regex pattern"))
    .collect()
});

static CONTRAST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"this plan",
        r"this (breaks|fixes|delivers)",
        r"not (just|merely|simply)",
        r"instead",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Valid regex pattern"))
    .collect()
});

const MASTERS_KEYWORDS: [&str; 4] = [
    "age 45+",
    "age 50+",
    "recovery protocols for 50+",
    "masters-specific",
];

const REPEATED_PHRASES: [&str; 5] = [
    "everything here is calibrated",
    "this plan delivers",
    "built for",
    "designed for",
    "race-day capacity",
];

const EMERGENCY_PHRASES: [&str; 6] = [
    "emergency preparation",
    "limited time",
    "salvage fitness",
    "6 weeks",
    "6-week",
    "last-minute",
];

/// Characters of the opening checked for the beat/contrast structure
const OPENING_CHARS: usize = 500;

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        0
    } else {
        haystack.matches(needle).count()
    }
}

fn skip_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Check one listing. `race_names` are the spellings the race may go by;
/// when `variant` is unknown the tier and level checks are skipped.
pub fn check_marketplace(
    subject: &str,
    html: &str,
    variant: Option<PlanVariant>,
    race_names: &[&str],
    settings: &ValidationSettings,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let text = strip_tags(html);
    let lower = text.to_lowercase();

    let chars = text_char_count(html);
    if chars > settings.max_marketplace_chars {
        findings.push(Finding::error(
            "char_limit",
            subject,
            format!("{} characters, limit is {}", chars, settings.max_marketplace_chars),
        ));
    }

    if let Some(m) = SECTION_REFERENCE.find(&text) {
        findings.push(Finding::error(
            "section_reference",
            subject,
            format!("guide section reference '{}' in listing", m.as_str()),
        ));
    }

    let tokens = leftover_tokens(html);
    if !tokens.is_empty() {
        findings.push(Finding::error(
            "placeholder",
            subject,
            format!("unreplaced tokens: {}", tokens.join(", ")),
        ));
    }

    for phrase in &settings.forbidden_phrases {
        if lower.contains(&phrase.to_lowercase()) {
            findings.push(Finding::error(
                "coach_speak",
                subject,
                format!("forbidden phrase '{}'", phrase),
            ));
        }
    }

    let mentions = race_names
        .iter()
        .map(|name| count_occurrences(&lower, &name.to_lowercase()))
        .max()
        .unwrap_or(0);
    if !race_names.is_empty() {
        if mentions < settings.min_race_mentions {
            findings.push(Finding::warning(
                "race_mentions",
                subject,
                format!(
                    "race named {} time(s), expected at least {}",
                    mentions, settings.min_race_mentions
                ),
            ));
        } else if mentions > settings.max_race_mentions {
            findings.push(Finding::warning(
                "race_mentions",
                subject,
                format!(
                    "race named {} times, more than {}",
                    mentions, settings.max_race_mentions
                ),
            ));
        }
    }

    for phrase in REPEATED_PHRASES {
        let n = count_occurrences(&lower, phrase);
        if n > 1 {
            findings.push(Finding::warning(
                "repetition",
                subject,
                format!("'{}' appears {} times", phrase, n),
            ));
        }
    }

    if let Some(variant) = variant {
        let body = skip_chars(&lower, settings.header_skip_chars);
        if !variant.tier.keywords().iter().any(|k| body.contains(k)) {
            findings.push(Finding::warning(
                "tier_keywords",
                subject,
                format!("no {} keyword in the listing body", variant.tier),
            ));
        }

        if !variant.is_masters() {
            let hits: Vec<&str> = MASTERS_KEYWORDS
                .iter()
                .copied()
                .filter(|k| lower.contains(k))
                .collect();
            if hits.len() >= settings.masters_leak_threshold {
                findings.push(Finding::error(
                    "masters_leak",
                    subject,
                    format!("masters copy in a {} plan: {}", variant.level, hits.join(", ")),
                ));
            }
        }

        if variant.level != PlanLevel::SaveMyRace {
            let hits: Vec<&str> = EMERGENCY_PHRASES
                .iter()
                .copied()
                .filter(|p| lower.contains(p))
                .collect();
            if !hits.is_empty() {
                findings.push(Finding::warning(
                    "emergency_language",
                    subject,
                    format!("emergency wording in a {} plan: {}", variant.level, hits.join(", ")),
                ));
            }
        }
    }

    let opening = take_chars(&lower, OPENING_CHARS);
    let has_beat = BEAT_PATTERNS.iter().any(|re| re.is_match(opening));
    let has_contrast = CONTRAST_PATTERNS.iter().any(|re| re.is_match(opening));
    if !(has_beat && has_contrast) {
        findings.push(Finding::info(
            "beat_contrast",
            subject,
            "opening lacks a problem/contrast beat",
        ));
    }

    findings
}

/// Validate every listing under `dir`
pub fn validate_marketplace_dir(
    dir: &Path,
    race_names: &[&str],
    settings: &ValidationSettings,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();
    let is_listing = |p: &Path| p.file_name().and_then(|n| n.to_str()) == Some(LISTING_FILE);
    for path in collect_files(dir, &is_listing)? {
        let subject = subject_for(dir, &path);
        let variant = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .and_then(PlanVariant::from_folder_name);
        if variant.is_none() {
            tracing::debug!(file = %subject, "no plan variant in folder name");
        }
        let html = fs::read_to_string(&path)?;
        report.record(check_marketplace(&subject, &html, variant, race_names, settings));
    }
    Ok(report)
}
