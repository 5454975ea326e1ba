use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{DataError, GravelKitError, Result};

/// A JSON value that may arrive as a number or a string, e.g. `"dark_mile": 150`
/// or `"dark_mile": "150"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(v) => f.write_str(v),
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Int(0)
    }
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Text(v) => v.trim().replace(',', "").parse().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::Float(v) => Some(*v as i64),
            Scalar::Text(v) => v.trim().replace(',', "").parse().ok(),
        }
    }
}

/// Race record driving every generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceData {
    pub race_metadata: RaceMetadata,

    #[serde(default)]
    pub race_hooks: RaceHooks,

    #[serde(default)]
    pub workout_modifications: WorkoutModifications,

    #[serde(default)]
    pub non_negotiables: Vec<NonNegotiable>,

    #[serde(default)]
    pub masterclass_topics: MasterclassTopics,

    /// Free-form values for the guide, e.g. `DARK_MILE`
    #[serde(default)]
    pub guide_variables: BTreeMap<String, Scalar>,

    #[serde(default)]
    pub marketplace_variables: MarketplaceVariables,

    /// Fields this crate does not interpret; kept so the race folder copy is lossless
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_feet: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceHooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punchy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mile: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutModifications {
    #[serde(default)]
    pub heat_training: HeatTraining,

    #[serde(default)]
    pub aggressive_fueling: AggressiveFueling,

    #[serde(default)]
    pub dress_rehearsal: DressRehearsal,

    #[serde(default)]
    pub robust_taper: RobustTaper,

    #[serde(default)]
    pub gravel_grit: GravelGrit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatTraining {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub tier_1_weeks: Vec<u32>,
    #[serde(default)]
    pub tier_2_weeks: Vec<u32>,
    #[serde(default)]
    pub tier_3_weeks: Vec<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggressiveFueling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_carbs_per_hour: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DressRehearsal {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    /// Day name that must appear in the workout name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    /// Ride length per tier key
    #[serde(default)]
    pub duration_hours: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobustTaper {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub weeks: Vec<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GravelGrit {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
}

/// Either a bare string or an object carrying a `requirement`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NonNegotiable {
    Text(String),
    Detailed(serde_json::Map<String, serde_json::Value>),
}

impl NonNegotiable {
    pub fn requirement(&self) -> String {
        match self {
            NonNegotiable::Text(text) => text.clone(),
            NonNegotiable::Detailed(map) => match map.get("requirement") {
                Some(serde_json::Value::String(text)) => text.clone(),
                _ => serde_json::Value::Object(map.clone()).to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterclassTopics {
    #[serde(default)]
    pub priority_order: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_hook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_hook_detail: Option<String>,
}

impl RaceData {
    /// Load race data from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path.as_ref())
    }

    pub fn name(&self) -> &str {
        &self.race_metadata.name
    }

    /// Dark mile from the race hooks, falling back to 150
    pub fn dark_mile(&self) -> String {
        self.race_hooks
            .dark_mile
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "150".to_string())
    }

    /// Display name for marketplace headers
    pub fn marketplace_name(&self) -> &str {
        self.marketplace_variables
            .race_name
            .as_deref()
            .unwrap_or(&self.race_metadata.name)
    }
}

/// Plan template: ordered weeks of named workouts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanTemplate {
    #[serde(default)]
    pub plan_metadata: PlanMetadata,

    #[serde(default)]
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_athlete: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_hours: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    #[serde(default = "default_week_number")]
    pub week_number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workouts: Option<Vec<Workout>>,

    /// Alternative block options, keyed by block name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workouts_by_block: Option<BTreeMap<String, Vec<Workout>>>,
}

fn default_week_number() -> u32 {
    1
}

impl Week {
    /// Every workout in the week, paired with its block name when the week
    /// offers block options. Block options take precedence over plain workouts.
    pub fn entries(&self) -> Vec<(Option<&str>, &Workout)> {
        if let Some(blocks) = &self.workouts_by_block {
            return blocks
                .iter()
                .flat_map(|(block, workouts)| {
                    workouts.iter().map(move |w| (Some(block.as_str()), w))
                })
                .collect();
        }
        self.workouts
            .iter()
            .flatten()
            .map(|w| (None, w))
            .collect()
    }
}

/// Characteristics that decide which race notes a workout receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutTag {
    LongRide,
    Quality,
    Endurance,
    Rest,
    Race,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Raw ZWO block elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<String>,

    /// Archetype key used to generate blocks when `blocks` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,

    /// Progression level 1-6 for the archetype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<WorkoutTag>,
}

const LONG_RIDE_KEYWORDS: &[&str] = &["Long", "Extended", "Dress Rehearsal"];

const QUALITY_KEYWORDS: &[&str] = &[
    "Hard Session",
    "Quality",
    "Threshold",
    "VO2max",
    "Mixed",
    "Race",
    "Simulation",
    "G-Spot",
    "Gspot",
    "Sweet Spot",
    "Tempo",
    "Peak",
    "HIIT",
];

const ENDURANCE_KEYWORDS: &[&str] = &["endurance", "easy", "z2", "recovery", "spin", "aerobic"];

static REST_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\brest\b").expect("valid rest pattern"));

static MULTI_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[5-9]").expect("valid digit pattern"));

impl Workout {
    pub fn has_tag(&self, tag: WorkoutTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Keyword classifier applied to workouts that arrive without tags
    pub fn keyword_tags(&self) -> Vec<WorkoutTag> {
        let name = self.name.as_str();
        let lower = name.to_lowercase();
        let mut tags = Vec::new();

        let long_ride = LONG_RIDE_KEYWORDS.iter().any(|k| name.contains(k))
            || (self.description.contains("hours") && MULTI_HOUR.is_match(&self.description));
        let quality = QUALITY_KEYWORDS.iter().any(|k| name.contains(k));
        let rest = REST_WORD.is_match(name);
        let endurance =
            ENDURANCE_KEYWORDS.iter().any(|k| lower.contains(k)) && !quality && !rest;

        if long_ride {
            tags.push(WorkoutTag::LongRide);
        }
        if quality {
            tags.push(WorkoutTag::Quality);
        }
        if endurance {
            tags.push(WorkoutTag::Endurance);
        }
        if rest {
            tags.push(WorkoutTag::Rest);
        }
        if name.to_uppercase().contains("RACE") {
            tags.push(WorkoutTag::Race);
        }
        tags
    }
}

impl PlanTemplate {
    /// Load a plan template and fill in tags for untagged workouts
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut template: PlanTemplate = load_json(path.as_ref())?;
        template.classify_untagged();
        Ok(template)
    }

    pub fn classify_untagged(&mut self) {
        for week in &mut self.weeks {
            let plain = week.workouts.iter_mut().flatten();
            let blocked = week
                .workouts_by_block
                .iter_mut()
                .flat_map(|blocks| blocks.values_mut())
                .flatten();
            for workout in plain.chain(blocked) {
                if workout.tags.is_empty() {
                    workout.tags = workout.keyword_tags();
                }
            }
        }
    }

    pub fn workout_count(&self) -> usize {
        self.weeks.iter().map(|w| w.entries().len()).sum()
    }
}

pub(crate) fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(DataError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| {
        GravelKitError::Data(DataError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workout(name: &str) -> Workout {
        Workout {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Int(150).to_string(), "150");
        assert_eq!(Scalar::Float(200.0).to_string(), "200");
        assert_eq!(Scalar::Float(119.7).to_string(), "119.7");
        assert_eq!(Scalar::Text("mile 150".into()).to_string(), "mile 150");
        assert_eq!(Scalar::Text("11,000".into()).as_i64(), Some(11000));
    }

    #[test]
    fn test_race_data_defaults() {
        let race: RaceData = serde_json::from_value(json!({
            "race_metadata": {"name": "Unbound 200", "distance_miles": 200},
            "non_negotiables": [
                "Heat adaptation",
                {"requirement": "Two 6-hour rides", "by_week": 8}
            ],
            "race_characteristics": {"climate": "hot"}
        }))
        .unwrap();

        assert_eq!(race.name(), "Unbound 200");
        assert_eq!(race.dark_mile(), "150");
        assert_eq!(race.marketplace_name(), "Unbound 200");
        assert_eq!(race.non_negotiables[1].requirement(), "Two 6-hour rides");
        assert!(race.extra.contains_key("race_characteristics"));
        assert!(!race.workout_modifications.heat_training.enabled);
    }

    #[test]
    fn test_keyword_tags() {
        let tags = workout("W08 Sat - Long Endurance Ride").keyword_tags();
        assert!(tags.contains(&WorkoutTag::LongRide));
        assert!(tags.contains(&WorkoutTag::Endurance));
        assert!(!tags.contains(&WorkoutTag::Quality));

        let tags = workout("W03 Tue - Threshold Intervals").keyword_tags();
        assert_eq!(tags, vec![WorkoutTag::Quality]);

        let tags = workout("W01 Mon - Rest Day").keyword_tags();
        assert_eq!(tags, vec![WorkoutTag::Rest]);

        let tags = workout("W12 Sat - RACE DAY").keyword_tags();
        assert!(tags.contains(&WorkoutTag::Race));
        assert!(tags.contains(&WorkoutTag::Quality) == false);

        let mut long = workout("W09 Sat - Big Day");
        long.description = "Ride 6 hours at Z2".to_string();
        assert!(long.keyword_tags().contains(&WorkoutTag::LongRide));
    }

    #[test]
    fn test_explicit_tags_are_kept() {
        let mut plan: PlanTemplate = serde_json::from_value(json!({
            "weeks": [{
                "week_number": 2,
                "workouts": [
                    {"name": "W02 Sat - Long Ride", "tags": ["quality"]},
                    {"name": "W02 Sun - Easy Spin"}
                ]
            }]
        }))
        .unwrap();
        plan.classify_untagged();

        let workouts = plan.weeks[0].workouts.as_ref().unwrap();
        assert_eq!(workouts[0].tags, vec![WorkoutTag::Quality]);
        assert_eq!(workouts[1].tags, vec![WorkoutTag::Endurance]);
    }

    #[test]
    fn test_week_entries_prefer_blocks() {
        let plan: PlanTemplate = serde_json::from_value(json!({
            "weeks": [{
                "week_number": 5,
                "workouts": [{"name": "ignored"}],
                "workouts_by_block": {
                    "climbing": [{"name": "W05 Tue - Mixed Climbing"}],
                    "speed": [{"name": "W05 Tue - 30/30s"}, {"name": "W05 Thu - Tempo"}]
                }
            }]
        }))
        .unwrap();

        let entries = plan.weeks[0].entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, Some("climbing"));
        assert_eq!(plan.workout_count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RaceData::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(
            err,
            GravelKitError::Data(DataError::FileNotFound { .. })
        ));
    }
}
