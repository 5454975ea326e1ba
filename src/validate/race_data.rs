//! Race data checks
//!
//! Looks for leftover placeholder text, scores that contradict their own
//! explanations, rating arithmetic, and vitals that disagree with the
//! race's research notes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::{Finding, ValidationReport};
use crate::error::Result;
use crate::landing::data::{GravelGodRating, LandingData, LandingDocument};

const PLACEHOLDERS: [&str; 6] = ["TBD", "PLACEHOLDER", "TODO", "FIXME", "XXX", "NEEDS_RESEARCH"];

const NO_ALTITUDE_TERMS: [&str; 5] = ["zero", "no ", "not ", "irrelevant", "sea level"];
const HIGH_ALTITUDE_TERMS: [&str; 4] = ["10,000", "9,000", "8,000", "acclimat"];
const PRESTIGE_MARKERS: [&str; 8] = [
    "lifetime",
    "grand prix",
    "lgp",
    "iconic",
    "$100k",
    "$50k",
    "uci",
    "world",
];

const ELEVATION_TOLERANCE: f64 = 0.30;
const DISTANCE_TOLERANCE: f64 = 0.10;
const FEET_PER_METER: f64 = 3.281;

/// Stated overall score may differ from the computed one by this much
const OVERALL_TOLERANCE: i64 = 2;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?").expect("Valid regex pattern")
});

fn excerpt(text: &str) -> String {
    text.chars().take(100).collect()
}

/// Every string in the record containing placeholder text
pub fn check_placeholders(subject: &str, value: &Value) -> Vec<Finding> {
    fn walk(value: &Value, path: &str, subject: &str, out: &mut Vec<Finding>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    walk(child, &child_path, subject, out);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    walk(child, &format!("{}[{}]", path, i), subject, out);
                }
            }
            Value::String(text) => {
                let upper = text.to_uppercase();
                for placeholder in PLACEHOLDERS {
                    if upper.contains(placeholder) {
                        out.push(Finding::warning(
                            "placeholder",
                            subject,
                            format!("'{}' at {}: {}", placeholder, path, excerpt(text)),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    let mut findings = Vec::new();
    walk(value, "", subject, &mut findings);
    findings
}

/// Altitude and prestige scores against their explanations
pub fn check_score_explanations(subject: &str, race: &LandingData) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(altitude) = race.ratings_breakdown.get("altitude") {
        let explanation = altitude.explanation.to_lowercase();
        if altitude.score >= 4 && NO_ALTITUDE_TERMS.iter().any(|t| explanation.contains(t)) {
            findings.push(Finding::error(
                "score_mismatch",
                subject,
                format!(
                    "altitude score {} but the explanation says altitude is not a factor: {}",
                    altitude.score,
                    excerpt(&explanation)
                ),
            ));
        }
        if altitude.score <= 2 && HIGH_ALTITUDE_TERMS.iter().any(|t| explanation.contains(t)) {
            findings.push(Finding::warning(
                "score_mismatch",
                subject,
                format!(
                    "altitude score {} looks low for: {}",
                    altitude.score,
                    excerpt(&explanation)
                ),
            ));
        }
    }

    if let Some(prestige) = race.ratings_breakdown.get("prestige") {
        let explanation = prestige.explanation.to_lowercase();
        if prestige.score == 5 && !PRESTIGE_MARKERS.iter().any(|m| explanation.contains(m)) {
            findings.push(Finding::warning(
                "score_mismatch",
                subject,
                "prestige 5 without a series, purse or iconic-status mention",
            ));
        }
    }

    findings
}

pub fn check_tier(subject: &str, rating: &GravelGodRating) -> Vec<Finding> {
    let expected = rating.expected_tier();
    let has_note = rating.tier_note.as_deref().is_some_and(|n| !n.trim().is_empty());
    if rating.tier != expected && !has_note {
        vec![Finding::warning(
            "tier_mismatch",
            subject,
            format!(
                "tier {} does not match score {} (expected tier {}); add a tier_note for an override",
                rating.tier, rating.overall_score, expected
            ),
        )]
    } else {
        Vec::new()
    }
}

/// The 14-variable rating adds up to its stated totals
pub fn check_rating_math(subject: &str, rating: &GravelGodRating) -> Vec<Finding> {
    let mut findings = Vec::new();

    let course = rating.course_sum();
    if course != rating.course_profile {
        findings.push(Finding::error(
            "math_error",
            subject,
            format!(
                "course variables sum to {}, course_profile is {}",
                course, rating.course_profile
            ),
        ));
    }

    let editorial = rating.editorial_sum();
    if editorial != rating.biased_opinion {
        findings.push(Finding::error(
            "math_error",
            subject,
            format!(
                "editorial variables sum to {}, biased_opinion is {}",
                editorial, rating.biased_opinion
            ),
        ));
    }

    let expected = rating.expected_overall();
    if (expected - rating.overall_score).abs() > OVERALL_TOLERANCE {
        findings.push(Finding::warning(
            "math_error",
            subject,
            format!(
                "overall score {} but ({}+{})/70 gives {}",
                rating.overall_score, course, editorial, expected
            ),
        ));
    }

    findings
}

/// Figures pulled from research notes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchFacts {
    pub distances: Vec<f64>,
    pub elevations: Vec<f64>,
}

fn numbers_in(line: &str) -> impl Iterator<Item = f64> + '_ {
    NUMBER
        .find_iter(line)
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
}

impl ResearchFacts {
    pub fn parse(markdown: &str) -> Self {
        let mut facts = ResearchFacts::default();
        for line in markdown.lines() {
            let lower = line.to_lowercase();
            if lower.contains("distance") {
                facts.distances.extend(numbers_in(line));
            }
            if ["elevation", "climbing", "gain", "vert"]
                .iter()
                .any(|t| lower.contains(t))
            {
                facts.elevations.extend(
                    numbers_in(line)
                        .filter(|n| (100.0..=50_000.0).contains(n) && !(2015.0..=2030.0).contains(n)),
                );
            }
        }
        facts
    }
}

fn relative_difference(a: f64, b: f64) -> f64 {
    let larger = a.max(b);
    if larger <= 0.0 {
        0.0
    } else {
        (a - b).abs() / larger
    }
}

/// Vitals against the closest figure in the research notes
pub fn check_against_research(subject: &str, race: &LandingData, facts: &ResearchFacts) -> Vec<Finding> {
    let mut findings = Vec::new();

    let elevation = race.vitals.elevation_ft.as_ref().and_then(|s| s.as_f64());
    if let Some(elevation) = elevation.filter(|e| *e > 0.0) {
        let closest = facts
            .elevations
            .iter()
            .flat_map(|r| [*r, r * FEET_PER_METER])
            .map(|candidate| relative_difference(elevation, candidate))
            .fold(f64::INFINITY, f64::min);
        if closest.is_finite() && closest > ELEVATION_TOLERANCE {
            findings.push(Finding::error(
                "elevation_mismatch",
                subject,
                format!(
                    "elevation {} ft is {:.0}% off the closest research figure",
                    elevation,
                    closest * 100.0
                ),
            ));
        }
    }

    let distance = race.vitals.distance_mi.as_ref().and_then(|s| s.as_f64());
    if let Some(distance) = distance.filter(|d| *d > 0.0) {
        let closest = facts
            .distances
            .iter()
            .map(|r| relative_difference(distance, *r))
            .fold(f64::INFINITY, f64::min);
        if closest.is_finite() && closest > DISTANCE_TOLERANCE {
            findings.push(Finding::warning(
                "distance_mismatch",
                subject,
                format!(
                    "distance {} mi is {:.0}% off the closest research figure",
                    distance,
                    closest * 100.0
                ),
            ));
        }
    }

    findings
}

/// All race data checks over a raw landing record
pub fn check_race_data(subject: &str, raw: &Value, research: Option<&str>) -> Vec<Finding> {
    let mut findings = check_placeholders(subject, raw);

    let doc: LandingDocument = match serde_json::from_value(raw.clone()) {
        Ok(doc) => doc,
        Err(err) => {
            findings.push(Finding::error("parse", subject, err.to_string()));
            return findings;
        }
    };
    let race = &doc.race;

    findings.extend(check_score_explanations(subject, race));
    findings.extend(check_tier(subject, &race.gravel_god_rating));
    findings.extend(check_rating_math(subject, &race.gravel_god_rating));

    match research {
        Some(markdown) => {
            findings.extend(check_against_research(subject, race, &ResearchFacts::parse(markdown)))
        }
        None => findings.push(Finding::warning(
            "missing_file",
            subject,
            "no research notes; vitals not cross-checked",
        )),
    }

    findings
}

/// Validate one race data file, with its research notes when available
pub fn validate_race_file(path: &Path, research: Option<&Path>) -> Result<ValidationReport> {
    let subject = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_end_matches("-data").to_string())
        .unwrap_or_else(|| path.display().to_string());

    let raw: Value = crate::models::load_json(path)?;
    let notes = match research {
        Some(p) if p.exists() => Some(fs::read_to_string(p)?),
        Some(p) => {
            tracing::warn!(path = %p.display(), "research notes not found");
            None
        }
        None => None,
    };

    let mut report = ValidationReport::new();
    report.record(check_race_data(&subject, &raw, notes.as_deref()));
    Ok(report)
}
