use std::fs;

use gravelkit::landing::{self, LandingDocument, LandingSection};
use gravelkit::validate::{landing::validate_elementor_file, race_data::validate_race_file, Severity};
use serde_json::json;

fn landing_record() -> serde_json::Value {
    json!({"race": {
        "name": "Unbound 200",
        "display_name": "Unbound Gravel 200",
        "tagline": "The race that made gravel a discipline.",
        "vitals": {
            "location": "Emporia, Kansas",
            "date_specific": "2026: May 30",
            "distance_mi": 200,
            "elevation_ft": 11000,
            "terrain_types": ["Flint Hills chert", "Cattle guards"],
            "field_size": "~1,200",
            "registration": "Lottery"
        },
        "gravel_god_rating": {
            "overall_score": 86, "course_profile": 30, "biased_opinion": 30, "tier": 1,
            "length": 5, "technicality": 4, "elevation": 4, "climate": 5, "altitude": 2, "adventure": 5, "logistics": 5,
            "prestige": 5, "race_quality": 5, "experience": 5, "community": 5, "field_depth": 4, "value": 3, "expenses": 3
        },
        "ratings_breakdown": {
            "length": {"score": 5, "explanation": "200 miles."},
            "altitude": {"score": 2, "explanation": "Kansas. About 1,200 ft."},
            "prestige": {"score": 5, "explanation": "Life Time Grand Prix anchor event."}
        },
        "course_description": {
            "character": "Rolling prairie with sharp rock.",
            "ridewithgps_id": 12345,
            "suffering_zones": [
                {"mile": 85, "label": "Teterville", "desc": "Rock garden after rock garden."},
                {"mile": 160, "label": "The Dark Mile", "desc": "Everything hurts."}
            ]
        },
        "final_verdict": {"should_you_race": "Yes, if you respect it. It will find every weakness you bring."},
        "black_pill": {
            "title": "The Truth",
            "reality": "Half the field will not finish.",
            "consequences": ["Sidewall cuts", "Heat stroke"],
            "expectation_reset": "Your goal is to finish."
        },
        "logistics": {
            "airport": "Kansas City (MCI)",
            "lodging_strategy": "Book a year out.",
            "food": "Emporia fills up.",
            "packet_pickup": "Friday downtown",
            "parking": "Street parking",
            "official_site": "https://example.com/unbound"
        },
        "training_plans": {
            "marketplace_base_url": "https://www.trainingpeaks.com/training-plans/cycling",
            "plans": [
                {"tier": "Finisher", "level": "Intermediate", "name": "Finisher Intermediate", "weeks": 12,
                 "tp_id": 111, "tp_slug": "unbound-finisher-int"}
            ]
        }
    }})
}

fn elementor_base() -> serde_json::Value {
    let mut widgets: Vec<serde_json::Value> = LandingSection::ALL
        .iter()
        .map(|s| {
            json!({"widgetType": "html", "settings": {"html": format!("<div class=\"old\">{}</div>", s.marker().replace('"', "'"))}})
        })
        .collect();
    for (widget, section) in widgets.iter_mut().zip(LandingSection::ALL) {
        if let Some(id) = section.element_id() {
            widget["settings"]["_element_id"] = json!(id);
        } else {
            widget["settings"]["html"] = json!(format!("<div class=\"{}\"></div>", section.marker()));
        }
    }
    json!({"title": "Template", "content": [{"elType": "section", "elements": widgets}]})
}

#[test]
fn test_elementor_round_trip_places_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.json");
    fs::write(&base_path, elementor_base().to_string()).unwrap();

    let doc: LandingDocument = serde_json::from_value(landing_record()).unwrap();
    let out = dir.path().join("out").join("unbound.json");
    let (path, missing) = landing::write_landing(&doc.race, Some(&base_path), &out).unwrap();
    assert!(missing.is_empty(), "{:?}", missing);

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["title"], "Unbound Gravel 200 Landing Page");

    let report = validate_elementor_file(&path).unwrap();
    assert!(report.findings.is_empty(), "{}", report.summary_table());
}

#[test]
fn test_preview_contains_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let doc: LandingDocument = serde_json::from_value(landing_record()).unwrap();
    let out = dir.path().join("preview.html");
    landing::write_landing(&doc.race, None, &out).unwrap();

    let html = fs::read_to_string(out).unwrap();
    for section in LandingSection::ALL {
        assert!(html.contains(section.marker()), "missing {}", section.label());
    }
    assert!(!html.contains("<script"));
}

#[test]
fn test_race_record_validates_cleanly_with_research() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("unbound-200-data.json");
    fs::write(&data, landing_record().to_string()).unwrap();
    let research = dir.path().join("unbound-200.md");
    fs::write(
        &research,
        "## Official data\n- Distance: 200 miles (also a 100 and 50)\n- Elevation gain: ~11,000 ft\n",
    )
    .unwrap();

    let report = validate_race_file(&data, Some(&research)).unwrap();
    assert_eq!(report.count(Severity::Error), 0, "{}", report.summary_table());
    assert_eq!(report.count(Severity::Warning), 0, "{}", report.summary_table());
}
