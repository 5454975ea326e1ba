//! Landing page race record
//!
//! Everything except the race name is optional. Renderers fall back to
//! neutral copy and log what was missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::models::{load_json, Scalar};

/// Vitals shown in place of a missing value
pub const VITAL_FALLBACK: &str = "See official site";

/// Top-level landing file: `{"race": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingDocument {
    pub race: LandingData,
}

impl LandingDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandingData {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub tagline: String,

    #[serde(default)]
    pub vitals: Vitals,

    #[serde(default)]
    pub gravel_god_rating: GravelGodRating,

    /// Category key (`length`, `altitude`, ...) to score and explanation
    #[serde(default)]
    pub ratings_breakdown: BTreeMap<String, RatingEntry>,

    #[serde(default)]
    pub course_description: CourseDescription,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tldr: Option<Tldr>,

    #[serde(default)]
    pub final_verdict: FinalVerdict,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black_pill: Option<BlackPill>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistics: Option<Logistics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_plans: Option<TrainingPlans>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LandingData {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_specific: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_mi: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_ft: Option<Scalar>,
    #[serde(default)]
    pub terrain_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_size: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize_purse: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aid_stations: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_time: Option<Scalar>,
}

/// The 14-variable rating plus its stated totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GravelGodRating {
    #[serde(default)]
    pub overall_score: i64,
    #[serde(default)]
    pub course_profile: i64,
    #[serde(default)]
    pub biased_opinion: i64,
    #[serde(default)]
    pub tier: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_note: Option<String>,

    /// Individual variables, e.g. `length`, `prestige`, `logistics`
    #[serde(flatten)]
    pub variables: BTreeMap<String, serde_json::Value>,
}

pub const COURSE_VARIABLES: [&str; 7] = [
    "length",
    "technicality",
    "elevation",
    "climate",
    "altitude",
    "adventure",
    "logistics",
];

pub const EDITORIAL_VARIABLES: [&str; 7] = [
    "prestige",
    "race_quality",
    "experience",
    "community",
    "field_depth",
    "value",
    "expenses",
];

impl GravelGodRating {
    /// Integer value of a rating variable, when present
    pub fn variable(&self, key: &str) -> Option<i64> {
        self.variables.get(key).and_then(serde_json::Value::as_i64)
    }

    pub fn course_sum(&self) -> i64 {
        COURSE_VARIABLES.iter().filter_map(|v| self.variable(v)).sum()
    }

    pub fn editorial_sum(&self) -> i64 {
        EDITORIAL_VARIABLES.iter().filter_map(|v| self.variable(v)).sum()
    }

    /// Overall score implied by the variables: total out of 70, as a percentage
    pub fn expected_overall(&self) -> i64 {
        let total = (self.course_sum() + self.editorial_sum()) as f64;
        (total / 70.0 * 100.0).round() as i64
    }

    /// Tier a score earns without a prestige override
    pub fn expected_tier(&self) -> i64 {
        match self.overall_score {
            s if s >= 85 => 1,
            s if s >= 75 => 2,
            _ => 3,
        }
    }

    pub fn tier_label(&self) -> String {
        self.tier_label
            .clone()
            .unwrap_or_else(|| format!("Tier {}", self.tier.max(1)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingEntry {
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ridewithgps_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ridewithgps_name: Option<String>,
    #[serde(default)]
    pub suffering_zones: Vec<SufferingZone>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SufferingZone {
    pub mile: Scalar,
    pub label: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tldr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_race_if: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalVerdict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_you_race: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlackPill {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reality: String,
    #[serde(default)]
    pub consequences: Vec<String>,
    #[serde(default)]
    pub expectation_reset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logistics {
    #[serde(default)]
    pub airport: String,
    #[serde(default)]
    pub lodging_strategy: String,
    #[serde(default)]
    pub food: String,
    #[serde(default)]
    pub packet_pickup: String,
    #[serde(default)]
    pub parking: String,
    #[serde(default)]
    pub official_site: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingPlans {
    #[serde(default)]
    pub marketplace_base_url: String,
    #[serde(default)]
    pub plans: Vec<MarketedPlan>,
}

/// A plan as listed on the marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketedPlan {
    pub tier: String,
    pub level: String,
    pub name: String,
    pub weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tp_id: Scalar,
    pub tp_slug: String,
}

impl MarketedPlan {
    pub const DEFAULT_CATEGORY: &'static str = "gran-fondo-century";

    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.category.as_deref().unwrap_or(Self::DEFAULT_CATEGORY),
            self.tp_id,
            self.tp_slug
        )
    }

    /// Level as shown on cards; legacy "Emergency" plans are Save My Race
    pub fn level_display(&self) -> &str {
        if self.level == "Emergency" {
            "Save My Race"
        } else {
            &self.level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_record_loads() {
        let doc: LandingDocument = serde_json::from_value(json!({
            "race": {"name": "Mid South"}
        }))
        .unwrap();
        assert_eq!(doc.race.display_name(), "Mid South");
        assert!(doc.race.black_pill.is_none());
        assert_eq!(doc.race.gravel_god_rating.course_sum(), 0);
    }

    #[test]
    fn test_rating_math() {
        let rating: GravelGodRating = serde_json::from_value(json!({
            "overall_score": 86, "course_profile": 30, "biased_opinion": 30, "tier": 1,
            "length": 5, "technicality": 4, "elevation": 4, "climate": 5, "altitude": 2, "adventure": 5, "logistics": 5,
            "prestige": 5, "race_quality": 5, "experience": 5, "community": 5, "field_depth": 4, "value": 3, "expenses": 3
        }))
        .unwrap();
        assert_eq!(rating.course_sum(), 30);
        assert_eq!(rating.editorial_sum(), 30);
        assert_eq!(rating.expected_overall(), 86);
        assert_eq!(rating.expected_tier(), 1);
        assert_eq!(rating.tier_label(), "Tier 1");
    }

    #[test]
    fn test_marketed_plan_url() {
        let plan: MarketedPlan = serde_json::from_value(json!({
            "tier": "Finisher", "level": "Emergency", "name": "Save My Race", "weeks": 6,
            "tp_id": 12345, "tp_slug": "unbound-finisher-smr"
        }))
        .unwrap();
        assert_eq!(
            plan.url("https://www.trainingpeaks.com/training-plans/cycling/"),
            "https://www.trainingpeaks.com/training-plans/cycling/gran-fondo-century/12345/unbound-finisher-smr"
        );
        assert_eq!(plan.level_display(), "Save My Race");
    }
}
