//! Varied marketing copy
//!
//! Every listing draws its headline, body and topic teasers from the pools
//! in [`pools`]. Selection is seeded, so regenerating a variant produces the
//! same text; the seed is derived from race, tier and level unless the
//! configuration pins one.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::RaceData;
use crate::plans::{PlanLevel, Tier};

pub mod pools;

pub use pools::{RequirementKind, Topic, CHECKMARK};

/// Seeded picker over copy pools
#[derive(Debug, Clone)]
pub struct CopyPicker {
    rng: StdRng,
}

impl CopyPicker {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picker whose seed is stable for a race and plan variant
    pub fn for_variant(race_name: &str, tier: Tier, level: PlanLevel) -> Self {
        Self::seeded(variant_seed(race_name, tier, level))
    }

    pub fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

/// First eight bytes of SHA-256 over `race|tier|level`
pub fn variant_seed(race_name: &str, tier: Tier, level: PlanLevel) -> u64 {
    let digest = Sha256::digest(format!("{}|{}|{}", race_name, tier.key(), level.key()));
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Replace `{name}` placeholders; unknown names are left in place
pub fn fill(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{}}}", key), value)
    })
}

/// Format with thousands separators, e.g. 11000 -> "11,000"
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// The full set of varied copy for one listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyVariations {
    pub fifteen_plans_headline: String,
    pub fifteen_plans_body: String,
    pub philosophy_tagline: String,
    pub masterclass_headline: String,
    pub masterclass_intro: String,
    pub tier_description: String,
    pub level_modifier: String,
    pub topic_heat: String,
    pub topic_fueling: String,
    pub topic_tactics: String,
    pub topic_mental: String,
    pub topic_execution: String,
    pub topic_recovery: String,
    pub topic_altitude: String,
}

impl CopyVariations {
    /// Draw every copy block in a fixed order from `picker`
    pub fn generate(race: &RaceData, tier: Tier, level: PlanLevel, picker: &mut CopyPicker) -> Self {
        let distance = race
            .race_metadata
            .distance_miles
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "100".to_string());
        let dark_mile = race
            .guide_variables
            .get("DARK_MILE")
            .map(ToString::to_string)
            .unwrap_or_else(|| race.dark_mile());

        Self {
            fifteen_plans_headline: picker.pick(pools::FIFTEEN_PLANS_HEADLINES).to_string(),
            fifteen_plans_body: picker.pick(pools::FIFTEEN_PLANS_BODIES).to_string(),
            philosophy_tagline: picker.pick(pools::PHILOSOPHY_TAGLINES).to_string(),
            masterclass_headline: picker.pick(pools::MASTERCLASS_HEADLINES).to_string(),
            masterclass_intro: picker.pick(pools::MASTERCLASS_INTROS).to_string(),
            tier_description: picker.pick(pools::tier_descriptions(tier)).to_string(),
            level_modifier: picker.pick(pools::level_modifiers(level)).to_string(),
            topic_heat: picker.pick(Topic::HeatTraining.variations()).to_string(),
            topic_fueling: fill(
                picker.pick(Topic::Fueling.variations()),
                &[("distance", distance)],
            ),
            topic_tactics: picker.pick(Topic::RaceTactics.variations()).to_string(),
            topic_mental: fill(
                picker.pick(Topic::MentalTraining.variations()),
                &[("dark_mile", dark_mile)],
            ),
            topic_execution: picker.pick(Topic::WorkoutExecution.variations()).to_string(),
            topic_recovery: picker.pick(Topic::Recovery.variations()).to_string(),
            topic_altitude: picker.pick(Topic::Altitude.variations()).to_string(),
        }
    }

    /// Teaser for a masterclass topic key from the race's priority list
    pub fn topic(&self, key: &str) -> Option<(&'static str, &str)> {
        let entry = match key {
            "heat" => ("Heat Training", &self.topic_heat),
            "altitude" => ("Altitude", &self.topic_altitude),
            "fueling" => ("Fueling", &self.topic_fueling),
            "tactics" => ("Race Tactics", &self.topic_tactics),
            "mental" => ("Mental Training", &self.topic_mental),
            "workout_execution" => ("Workout Execution", &self.topic_execution),
            "recovery_tires_strength" => ("Recovery, Tires, Strength", &self.topic_recovery),
            _ => return None,
        };
        Some((entry.0, entry.1.as_str()))
    }
}

/// Rephrase a non-negotiable with a checkmarked template from its family,
/// filling values from the race record where available
pub fn rephrase_requirement(requirement: &str, race: &RaceData, picker: &mut CopyPicker) -> String {
    let Some(kind) = RequirementKind::classify(requirement) else {
        return format!("{} {}", CHECKMARK, requirement);
    };

    let mut values: Vec<(&str, String)> = kind
        .defaults()
        .iter()
        .map(|(k, v)| (*k, v.to_string()))
        .collect();
    let mut set = |key: &'static str, value: String| {
        match values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => values.push((key, value)),
        }
    };

    let meta = &race.race_metadata;
    if let Some(distance) = &meta.distance_miles {
        set("distance", distance.to_string());
    }
    if let Some(elevation) = &meta.elevation_feet {
        let text = elevation
            .as_i64()
            .map(thousands)
            .unwrap_or_else(|| elevation.to_string());
        set("elevation", text);
    }
    if let Some(dark_mile) = race.guide_variables.get("DARK_MILE") {
        set("dark_mile", dark_mile.to_string());
    }
    set("checkmark", CHECKMARK.to_string());

    fill(picker.pick(kind.templates()), &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn race() -> RaceData {
        serde_json::from_value(json!({
            "race_metadata": {"name": "Unbound 200", "distance_miles": 200, "elevation_feet": 11000},
            "guide_variables": {"DARK_MILE": 150}
        }))
        .unwrap()
    }

    #[test]
    fn test_same_seed_same_copy() {
        let race = race();
        let a = CopyVariations::generate(
            &race,
            Tier::Compete,
            PlanLevel::Advanced,
            &mut CopyPicker::for_variant("Unbound 200", Tier::Compete, PlanLevel::Advanced),
        );
        let b = CopyVariations::generate(
            &race,
            Tier::Compete,
            PlanLevel::Advanced,
            &mut CopyPicker::for_variant("Unbound 200", Tier::Compete, PlanLevel::Advanced),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_copy_comes_from_pools() {
        let race = race();
        let copy = CopyVariations::generate(&race, Tier::Finisher, PlanLevel::Masters, &mut CopyPicker::seeded(7));
        assert!(pools::FIFTEEN_PLANS_HEADLINES.contains(&copy.fifteen_plans_headline.as_str()));
        assert!(pools::tier_descriptions(Tier::Finisher).contains(&copy.tier_description.as_str()));
        assert!(pools::level_modifiers(PlanLevel::Masters).contains(&copy.level_modifier.as_str()));
        assert!(!copy.topic_fueling.contains("{distance}"));
        assert!(!copy.topic_mental.contains("{dark_mile}"));
    }

    #[test]
    fn test_seeds_differ_by_variant() {
        assert_ne!(
            variant_seed("Unbound 200", Tier::Compete, PlanLevel::Advanced),
            variant_seed("Unbound 200", Tier::Compete, PlanLevel::Masters)
        );
    }

    #[test]
    fn test_topic_lookup() {
        let copy = CopyVariations::generate(&race(), Tier::Podium, PlanLevel::AdvancedGoat, &mut CopyPicker::seeded(1));
        assert_eq!(copy.topic("tactics").map(|t| t.0), Some("Race Tactics"));
        assert!(copy.topic("nutrition").is_none());
    }

    #[test]
    fn test_rephrase_requirement() {
        let race = race();
        let mut picker = CopyPicker::seeded(3);
        let text = rephrase_requirement("Climbing durability", &race, &mut picker);
        assert!(text.starts_with("✓ "));
        assert!(!text.contains('{'));
        if text.contains("feet") || text.contains("ft gain") {
            assert!(text.contains("11,000"));
        }
        assert_eq!(rephrase_requirement("Show up rested", &race, &mut picker), "✓ Show up rested");
    }

    #[test]
    fn test_fill_and_thousands() {
        assert_eq!(fill("{a} and {b}", &[("a", "1".into())]), "1 and {b}");
        assert_eq!(thousands(11000), "11,000");
        assert_eq!(thousands(950), "950");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
