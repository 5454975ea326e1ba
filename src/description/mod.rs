//! Structured workout descriptions
//!
//! Turns a workout name and its blocks into WARM-UP / MAIN SET / COOL-DOWN /
//! PURPOSE text. The session pattern comes from the name unless the caller
//! already knows it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::archetype::Archetype;
use crate::error::Result;
use crate::zwo::{parse_blocks, Block};

pub mod detect;
pub mod prescription;
pub mod structure;

pub use detect::{detect_pattern, SessionPattern};
pub use structure::{MainSetPart, WorkoutStructure};

use prescription::{rpe_for_power, zone_range_for_power};

pub const REST_DAY_TEXT: &str =
    "Complete rest day. Adaptation happens during rest. Light movement (walk, yoga) is fine.";

const DURABILITY_PURPOSE: &str = "Durability development. Building your ability to perform intervals when already fatigued—this is race simulation. The long Z2 ride first builds fatigue, then the intervals teach your body to sustain power when tired. This is exactly what you'll face in a 12-16 hour gravel race: needing to push hard after hours of riding.";

const DURABILITY_FALLBACK: &str = "Building race-specific durability through accumulated fatigue.";

static HRV_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)HRV\s+CHECK:[^•\n]+").expect("Valid regex pattern"));

static MASTERS_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)MASTERS\s+NOTE:[^•\n]+").expect("Valid regex pattern"));

/// Inputs for one description
#[derive(Debug, Clone, Default)]
pub struct DescriptionRequest<'a> {
    pub workout_name: &'a str,
    pub blocks: &'a [Block],
    /// Progression level, 1-6
    pub level: u8,
    /// Previous description; HRV and Masters notes are carried over
    pub existing: &'a str,
    /// Known pattern; detected from the name when absent
    pub pattern: Option<SessionPattern>,
}

impl<'a> DescriptionRequest<'a> {
    pub fn new(workout_name: &'a str, blocks: &'a [Block]) -> Self {
        Self {
            workout_name,
            blocks,
            level: 1,
            ..Default::default()
        }
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn existing(mut self, existing: &'a str) -> Self {
        self.existing = existing;
        self
    }

    pub fn pattern(mut self, pattern: SessionPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn build(&self) -> String {
        build_description(self)
    }
}

/// Convenience wrapper over a raw block fragment
pub fn describe_fragment(workout_name: &str, fragment: &str, level: u8) -> Result<String> {
    let blocks = parse_blocks(fragment)?;
    Ok(DescriptionRequest::new(workout_name, &blocks)
        .level(level)
        .build())
}

pub fn build_description(request: &DescriptionRequest<'_>) -> String {
    let pattern = request
        .pattern
        .unwrap_or_else(|| detect_pattern(request.workout_name));
    tracing::trace!(workout = request.workout_name, %pattern, "building description");

    if pattern.is(Archetype::Rest) {
        return REST_DAY_TEXT.to_string();
    }

    let structure = WorkoutStructure::analyze(request.blocks);
    let mut sections = Vec::new();

    if let Some(minutes) = structure.warmup_minutes.filter(|m| *m > 0) {
        sections.push(format!(
            "WARM-UP:\n• {}min building from Z1 to Z2 (RPE {})",
            minutes,
            rpe_for_power(0.65)
        ));
    }

    sections.push(format!(
        "MAIN SET:\n{}{}",
        main_set_text(&structure, pattern),
        guidance(&structure, pattern)
    ));

    if let Some(minutes) = structure.cooldown_minutes.filter(|m| *m > 0) {
        sections.push(format!(
            "COOL-DOWN:\n• {}min easy spin Z1-Z2 (RPE {})",
            minutes,
            rpe_for_power(0.60)
        ));
    }

    sections.push(format!("PURPOSE:\n{}", purpose_text(&structure, pattern, request.level)));

    for note in [&*HRV_NOTE, &*MASTERS_NOTE] {
        if let Some(found) = note.find(request.existing) {
            sections.push(format!("\n{}", found.as_str()));
        }
    }

    sections.join("\n\n")
}

fn main_set_text(structure: &WorkoutStructure, pattern: SessionPattern) -> String {
    if pattern.is(Archetype::NormalizedPower) || structure.free_ride.is_some() {
        let minutes = match structure.free_ride {
            Some(free_ride) => free_ride.minutes(),
            None if structure.main_minutes() > 0 => structure.main_minutes(),
            None => 180,
        };
        return format!(
            "• Target IF of 0.85 for {} minutes\n\
             • Put Normalized Power (NP) field on your head unit\n\
             • How you achieve it is up to you:\n  \
             - High average power throughout\n  \
             - Hard on uphills, easier on downhills\n  \
             - Variable power matching terrain\n\
             • Focus on managing NP to maintain IF of 0.85\n\
             • RPE: 6-7 (uncomfortably sustainable)",
            minutes
        );
    }

    if structure.main_sets.is_empty() {
        return "Unstructured session".to_string();
    }

    if structure.is_durability() {
        return durability_text(structure);
    }

    let mut lines = Vec::new();
    for part in &structure.main_sets {
        match part {
            MainSetPart::Intervals(set) => lines.push(format!(
                "• {}x{} @ {} FTP, RPE {} ({}min recovery)",
                set.reps,
                set.on_label(),
                zone_range_for_power(set.on_power),
                rpe_for_power(set.on_power),
                set.off_minutes()
            )),
            MainSetPart::OverUnder(ou) => {
                let pair = format!(
                    "({}min @ {} FTP, RPE {} / {}min @ {} FTP, RPE {}) x{}",
                    ou.under.minutes(),
                    zone_range_for_power(ou.under.power),
                    rpe_for_power(ou.under.power),
                    ou.over.minutes(),
                    zone_range_for_power(ou.over.power),
                    rpe_for_power(ou.over.power),
                    ou.reps_per_set
                );
                if ou.sets > 1 {
                    lines.push(format!("• {} sets of: {}", ou.sets, pair));
                    lines.push(format!(
                        "• {}min Z1 recovery between sets (RPE 1-2)",
                        ou.recovery_minutes
                    ));
                } else {
                    lines.push(format!("• {}", pair));
                }
            }
            MainSetPart::Steady(block) => lines.push(format!(
                "• {}min @ {} FTP, RPE {}",
                block.minutes(),
                zone_range_for_power(block.power),
                rpe_for_power(block.power)
            )),
        }
    }
    lines.join("\n")
}

/// Long Z2 first, intervals on tired legs, Z2 to finish
fn durability_text(structure: &WorkoutStructure) -> String {
    let z2_minutes = structure
        .durability_z2
        .iter()
        .map(|b| b.minutes())
        .fold(0, u32::saturating_add);
    let z2_rpe = rpe_for_power(0.70);
    let mut lines = Vec::new();

    if z2_minutes >= 60 {
        let hours = z2_minutes / 60;
        lines.push(format!(
            "• First {} hour{} Z2 (RPE {})",
            hours,
            if hours > 1 { "s" } else { "" },
            z2_rpe
        ));
        for set in structure.intervals() {
            lines.push(format!(
                "→ {}x{}min @ {} FTP, RPE {} ({}min recovery, RPE 1-2)",
                set.reps,
                set.on_minutes(),
                zone_range_for_power(set.on_power),
                rpe_for_power(set.on_power),
                set.off_minutes()
            ));
        }
        lines.push(format!("→ Final Z2 to complete ride (RPE {})", z2_rpe));
        return lines.join("\n");
    }

    for set in structure.intervals() {
        lines.push(format!(
            "• {}x{}min @ {} FTP, RPE {} ({}min recovery, RPE 1-2)",
            set.reps,
            set.on_minutes(),
            zone_range_for_power(set.on_power),
            rpe_for_power(set.on_power),
            set.off_minutes()
        ));
    }
    if lines.is_empty() {
        "Durability workout structure".to_string()
    } else {
        lines.join("\n")
    }
}

/// Cadence, position and strategy lines appended to MAIN SET
fn guidance(structure: &WorkoutStructure, pattern: SessionPattern) -> String {
    let cadence = prescription::cadence(pattern);
    let position = prescription::position(pattern);
    let mut text = String::new();

    if structure.is_durability() {
        text.push_str("\n• Z2 sections: Position alternation every 30 min (drops ↔ hoods)");
        text.push_str("\n• Intervals: Position as specified for interval type");
        text.push_str("\n• Cadence: Z2 self-selected, intervals per archetype");
    } else if pattern.is(Archetype::Endurance) {
        if structure.total_minutes >= 90 {
            if let Some((pos, _)) = position {
                text.push_str(&format!(
                    "\n• Position: {} - Alternate every 30 min: 30 min drops (aero) → 30 min hoods (power)",
                    pos
                ));
            }
            text.push_str(&format!(
                "\n• Cadence: {} - Comfortable endurance cadence",
                cadence.map(|(rpm, _)| rpm).unwrap_or("Self-selected")
            ));
        } else {
            if let Some((pos, _)) = position {
                text.push_str(&format!("\n• Position: {}", pos));
            }
            if let Some((rpm, why)) = cadence {
                text.push_str(&format!("\n• Cadence: {} ({})", rpm, why));
            }
        }
    } else if pattern.is(Archetype::NormalizedPower) {
        if let Some((rpm, why)) = cadence {
            text.push_str(&format!("\n• Cadence: {} ({})", rpm, why));
        }
        if let Some((pos, _)) = position {
            text.push_str(&format!("\n• Position: {}", pos));
        }
        text.push_str("\n• Strategy: Your choice—high average power, hard on uphills/easier on downhills, or variable matching terrain");
    } else if !pattern.is(Archetype::Testing) {
        if let Some((rpm, why)) = cadence {
            text.push_str(&format!("\n• Cadence: {} ({})", rpm, why));
        }
        if let Some((pos, _)) = position {
            text.push_str(&format!("\n• Position: {}", pos));
        }
    }
    text
}

fn purpose_text(structure: &WorkoutStructure, pattern: SessionPattern, level: u8) -> String {
    if !structure.is_durability() {
        return prescription::progression_purpose(pattern, level);
    }
    if level <= 1 {
        return DURABILITY_PURPOSE.to_string();
    }
    let addition = prescription::level_addition(pattern, level).unwrap_or(DURABILITY_FALLBACK);
    format!("{}\n\nLevel {}: {}", DURABILITY_PURPOSE, level, addition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{generate_blocks, Level};

    #[test]
    fn test_vo2_description_sections() {
        let text = describe_fragment(
            "W02 Tue - VO2max Intervals",
            r#"<Warmup Duration="1500" PowerLow="0.50" PowerHigh="0.75"/>
               <IntervalsT Repeat="5" OnDuration="240" OnPower="1.10" Cadence="100" OffDuration="240" OffPower="0.55"/>
               <Cooldown Duration="1200" PowerLow="0.70" PowerHigh="0.50"/>"#,
            2,
        )
        .unwrap();

        let expected_main = "MAIN SET:\n\
            • 5x4min @ 106-120% FTP, RPE 9 (4min recovery)\n\
            • Cadence: 90-100rpm (high turnover for VO2max efficiency)\n\
            • Position: Seated, hoods";
        assert!(text.starts_with("WARM-UP:\n• 25min building from Z1 to Z2 (RPE 3-4)\n\n"));
        assert!(text.contains(expected_main));
        assert!(text.contains("COOL-DOWN:\n• 20min easy spin Z1-Z2 (RPE 3-4)"));
        assert!(text.ends_with(
            "Level 2: Building volume. Same pattern, more work. The fitness is in the accumulation."
        ));
    }

    #[test]
    fn test_mixed_climbing_over_under() {
        let text = describe_fragment(
            "W05 Thu - Mixed Climbing",
            r#"<Warmup Duration="900" PowerLow="0.50" PowerHigh="0.75"/>
               <SteadyState Duration="180" Power="0.88"/>
               <SteadyState Duration="120" Power="0.95"/>
               <SteadyState Duration="180" Power="0.88"/>
               <SteadyState Duration="120" Power="0.95"/>
               <SteadyState Duration="180" Power="0.55"/>
               <Cooldown Duration="600" PowerLow="0.70" PowerHigh="0.50"/>"#,
            3,
        )
        .unwrap();

        assert!(text.contains(
            "• 2 sets of: (3min @ 88-92% FTP, RPE 6-7 / 2min @ 93-105% FTP, RPE 7-8) x1"
        ));
        assert!(text.contains("• 3min Z1 recovery between sets (RPE 1-2)"));
        assert!(text.contains("• Cadence: 70-80rpm (climbing simulation)"));
    }

    #[test]
    fn test_rest_day() {
        let text = describe_fragment("W01 Mon - Rest Day", "", 1).unwrap();
        assert_eq!(text, REST_DAY_TEXT);
    }

    #[test]
    fn test_unstructured_and_notes() {
        let blocks = parse_blocks(r#"<FreeRide Duration="3600"/>"#).unwrap();
        let text = DescriptionRequest::new("W03 Fri - Openers", &blocks)
            .existing("Old text • HRV CHECK: skip if HRV is 10% below baseline\nMASTERS NOTE: add a rest day if needed")
            .build();

        assert!(text.starts_with("MAIN SET:\nUnstructured session"));
        assert!(text.contains("\n\n\nHRV CHECK: skip if HRV is 10% below baseline"));
        assert!(text.ends_with("\n\n\nMASTERS NOTE: add a rest day if needed"));
    }

    #[test]
    fn test_long_endurance_guidance() {
        let blocks = parse_blocks(&generate_blocks("endurance", 3)).unwrap();
        let text = DescriptionRequest::new("W04 Sat - Endurance", &blocks)
            .level(3)
            .build();

        assert!(text.contains("• 120min @ 56-75% FTP, RPE 3-4"));
        assert!(text.contains("• Position: Alternating - Alternate every 30 min"));
        assert!(text.contains("• Cadence: self-selected - Comfortable endurance cadence"));
        assert!(!text.contains("Level 3:"));
    }

    #[test]
    fn test_normalized_power_main_set() {
        let blocks = parse_blocks(&generate_blocks("normalized_power", 1)).unwrap();
        let text = DescriptionRequest::new("Level 1 - Normalized Power / IF Target", &blocks)
            .level(1)
            .build();

        assert!(text.contains("• Target IF of 0.85 for 120 minutes"));
        assert!(text.contains("• Strategy: Your choice"));
        assert!(text.contains("Level 1: Introduction to NP/IF training."));
    }

    #[test]
    fn test_durability_ride() {
        let blocks = parse_blocks(
            r#"<SteadyState Duration="7200" Power="0.70"/>
               <IntervalsT Repeat="3" OnDuration="600" OnPower="0.95" OffDuration="300" OffPower="0.55"/>
               <SteadyState Duration="1800" Power="0.70"/>"#,
        )
        .unwrap();
        let text = DescriptionRequest::new("W08 Sat - Long Ride with Threshold", &blocks)
            .level(2)
            .build();

        assert!(text.contains("• First 2 hours Z2 (RPE 3-4)"));
        assert!(text.contains("→ 3x10min @ 93-105% FTP, RPE 7-8 (5min recovery, RPE 1-2)"));
        assert!(text.contains("→ Final Z2 to complete ride (RPE 3-4)"));
        assert!(text.contains("PURPOSE:\nDurability development."));
        assert!(text.contains("\n\nLevel 2: Building volume."));
    }

    #[test]
    fn test_explicit_pattern_overrides_name() {
        let level = Level::new(2).unwrap();
        let blocks = parse_blocks(&Archetype::ThresholdSteady.blocks(level)).unwrap();
        let name = Archetype::ThresholdSteady.workout_name(level);
        let text = DescriptionRequest::new(&name, &blocks)
            .level(2)
            .pattern(Archetype::ThresholdSteady.into())
            .build();

        assert!(text.contains("• 3x10min @ 93-105% FTP, RPE 7-8 (5min recovery)"));
        assert!(text.contains("PURPOSE:\nThreshold development."));
    }
}
