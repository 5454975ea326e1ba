use gravelkit::config::{MarketplaceSettings, ValidationSettings};
use gravelkit::marketplace::generate_marketplace;
use gravelkit::models::{PlanTemplate, RaceData};
use gravelkit::plans::PLAN_VARIANTS;
use gravelkit::template::leftover_tokens;
use gravelkit::validate::{marketplace::check_marketplace, Severity};
use proptest::prelude::*;
use serde_json::json;

fn race() -> RaceData {
    serde_json::from_value(json!({
        "race_metadata": {"name": "Unbound 200", "distance_miles": 200, "elevation_feet": 11000},
        "race_hooks": {
            "punchy": "200 miles of Flint Hills chert, wind and heat that ends more races than fitness does.",
            "detail": "Sidewall-slicing rock, 11,000 feet of rollers and a dark mile around 150.",
            "dark_mile": 150
        },
        "non_negotiables": [
            "Heat adaptation protocol in the final six weeks",
            {"requirement": "Two 6-hour rides with full race fueling", "by_week": 9},
            "Practice fueling at 80-100g carbs/hour",
            "Tire and sealant setup tested on chunky gravel"
        ],
        "masterclass_topics": {
            "priority_order": ["heat", "fueling", "mental", "tactics", "altitude", "workout_execution"]
        }
    }))
    .unwrap()
}

fn plan() -> PlanTemplate {
    serde_json::from_value(json!({"plan_metadata": {"target_hours": "12-18"}})).unwrap()
}

proptest! {
    #[test]
    fn listings_stay_within_the_character_limit(
        index in 0..PLAN_VARIANTS.len(),
        seed in any::<u64>(),
        rephrase in any::<bool>(),
    ) {
        let variant = PLAN_VARIANTS[index];
        let settings = MarketplaceSettings {
            copy_seed: Some(seed),
            rephrase_non_negotiables: rephrase,
            ..MarketplaceSettings::default()
        };
        let listing = generate_marketplace(&race(), &plan(), variant, &settings).unwrap();

        prop_assert!(!listing.over_limit, "{}: {} characters", variant, listing.char_count);
        prop_assert!(listing.char_count <= settings.char_limit);
        prop_assert!(leftover_tokens(&listing.html).is_empty());

        let findings = check_marketplace(
            "listing.html",
            &listing.html,
            Some(variant),
            &["Unbound 200"],
            &ValidationSettings::default(),
        );
        prop_assert!(
            findings.iter().all(|f| f.severity != Severity::Error),
            "{:?}",
            findings
        );
    }
}
