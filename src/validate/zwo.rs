//! Structural checks on `.zwo` files

use super::Finding;
use crate::zwo::{BlockKind, ZwoDocument, SPORT_TYPE};

const POWER_ATTRIBUTES: [&str; 5] = ["Power", "PowerLow", "PowerHigh", "OnPower", "OffPower"];

/// Highest plausible target, as a fraction of FTP
const MAX_POWER: f64 = 2.0;

/// Longest plausible single workout
const MAX_DURATION_SECONDS: u32 = 24 * 3600;

/// Workouts that legitimately skip a warm-up or cool-down
const UNSTRUCTURED_KEYWORDS: [&str; 3] = ["testing", "rest", "endurance"];

const DESCRIPTION_SECTIONS: [&str; 3] = ["WARM-UP:", "MAIN SET:", "COOL-DOWN:"];

/// Text of each description section, keyed by its header
fn description_sections(description: &str) -> Vec<(&'static str, &str)> {
    let mut starts: Vec<(usize, &'static str)> = DESCRIPTION_SECTIONS
        .iter()
        .filter_map(|h| description.find(h).map(|i| (i, *h)))
        .collect();
    starts.sort();

    starts
        .iter()
        .enumerate()
        .map(|(n, (start, header))| {
            let body_start = start + header.len();
            let end = starts.get(n + 1).map(|(i, _)| *i).unwrap_or(description.len());
            let body = description[body_start..end].split("\n\n").next().unwrap_or("");
            (*header, body)
        })
        .collect()
}

pub fn check_zwo(subject: &str, xml: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    let doc = match ZwoDocument::parse(xml) {
        Ok(doc) => doc,
        Err(err) => {
            findings.push(Finding::error("parse", subject, err.to_string()));
            return findings;
        }
    };

    if doc.blocks.is_empty() {
        findings.push(Finding::error("structure", subject, "workout has no blocks"));
        return findings;
    }

    let duration = doc.duration_seconds();
    if duration == 0 {
        findings.push(Finding::error("duration", subject, "total duration is zero"));
    } else if duration > MAX_DURATION_SECONDS {
        findings.push(Finding::error(
            "duration",
            subject,
            format!("total duration of {}s is longer than 24 hours", duration),
        ));
    }

    for (i, block) in doc.blocks.iter().enumerate() {
        for attr in POWER_ATTRIBUTES {
            if let Some(power) = block.attr_f64(attr) {
                if !(0.0..=MAX_POWER).contains(&power) {
                    findings.push(Finding::error(
                        "power_range",
                        subject,
                        format!("block {} ({}) has {}={}", i + 1, block.kind.tag(), attr, power),
                    ));
                }
            }
        }
    }

    if doc.sport_type != SPORT_TYPE {
        findings.push(Finding::warning(
            "sport_type",
            subject,
            format!("sport type '{}', expected '{}'", doc.sport_type, SPORT_TYPE),
        ));
    }

    let name = doc.name.to_lowercase();
    let exempt = UNSTRUCTURED_KEYWORDS.iter().any(|k| name.contains(k));
    if !exempt {
        let first_is_warmup = doc.blocks.first().map(|b| &b.kind) == Some(&BlockKind::Warmup);
        let last_is_cooldown = doc.blocks.last().map(|b| &b.kind) == Some(&BlockKind::Cooldown);
        if !first_is_warmup {
            findings.push(Finding::warning("structure", subject, "first block is not a Warmup"));
        }
        if !last_is_cooldown {
            findings.push(Finding::warning("structure", subject, "last block is not a Cooldown"));
        }
    }

    for (header, body) in description_sections(&doc.description) {
        if !body.contains("RPE") {
            findings.push(Finding::warning(
                "description",
                subject,
                format!("{} section has no RPE guidance", header.trim_end_matches(':')),
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Severity;
    use crate::zwo::parse_blocks;

    fn document(name: &str, description: &str, fragment: &str) -> String {
        ZwoDocument::new(name, description, parse_blocks(fragment).unwrap())
            .to_xml()
            .unwrap()
    }

    const STRUCTURED: &str = r#"<Warmup Duration="600" PowerLow="0.50" PowerHigh="0.75"/>
<IntervalsT Repeat="5" OnDuration="240" OffDuration="240" OnPower="1.10" OffPower="0.55"/>
<Cooldown Duration="600" PowerLow="0.70" PowerHigh="0.50"/>"#;

    #[test]
    fn test_well_formed_workout_is_clean() {
        let description = "WARM-UP:\n• 10min building from Z1 to Z2 (RPE 3-4)\n\nMAIN SET:\n• 5x4min @ 106-120% FTP, RPE 9\n\nCOOL-DOWN:\n• 10min easy spin Z1-Z2 (RPE 3-4)";
        let xml = document("W03 Tue - VO2max", description, STRUCTURED);
        assert!(check_zwo("w.zwo", &xml).is_empty());
    }

    #[test]
    fn test_out_of_range_power_is_an_error() {
        let xml = document(
            "W01 Thu - Sprints",
            "",
            r#"<Warmup Duration="600" PowerLow="0.5" PowerHigh="0.75"/>
<SteadyState Duration="30" Power="2.5"/>
<Cooldown Duration="600" PowerLow="0.7" PowerHigh="0.5"/>"#,
        );
        let findings = check_zwo("w.zwo", &xml);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].category, "power_range");
    }

    #[test]
    fn test_missing_warmup_is_a_warning_unless_exempt() {
        let fragment = r#"<SteadyState Duration="3600" Power="0.65"/>"#;
        let tempo = check_zwo("t.zwo", &document("W02 Wed - Tempo", "", fragment));
        assert_eq!(tempo.len(), 2);
        assert!(tempo.iter().all(|f| f.severity == Severity::Warning));

        let endurance = check_zwo("e.zwo", &document("W02 Sat - Endurance", "", fragment));
        assert!(endurance.is_empty());
    }

    #[test]
    fn test_section_without_rpe() {
        let description = "WARM-UP:\n• 10min easy\n\nMAIN SET:\n• 5x4min hard, RPE 9\n\nCOOL-DOWN:\n• 10min spin (RPE 2)";
        let findings = check_zwo("w.zwo", &document("W03 Tue - VO2max", description, STRUCTURED));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("WARM-UP"));
    }

    #[test]
    fn test_huge_interval_attributes_are_reported() {
        let xml = document(
            "W04 Tue - Threshold",
            "",
            r#"<Warmup Duration="600" PowerLow="0.5" PowerHigh="0.75"/>
<IntervalsT Repeat="100000" OnDuration="60000" OffDuration="1" OnPower="1.0" OffPower="0.5"/>
<Cooldown Duration="600" PowerLow="0.7" PowerHigh="0.5"/>"#,
        );
        let findings = check_zwo("w.zwo", &xml);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].category, "duration");
    }

    #[test]
    fn test_unparseable_file() {
        let findings = check_zwo("bad.zwo", "<workout_file><workout><SteadyState");
        assert_eq!(findings[0].severity, Severity::Error);

        let empty = check_zwo("empty.zwo", &document("W01 Mon - Rest", "", ""));
        assert_eq!(empty[0].category, "structure");
    }
}
