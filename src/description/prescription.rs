//! RPE, zone, cadence, position and purpose tables

use super::detect::SessionPattern;
use crate::archetype::Archetype;

/// RPE range for a fraction of FTP
pub fn rpe_for_power(power: f64) -> &'static str {
    if power < 0.55 {
        "1-2"
    } else if power < 0.76 {
        "3-4"
    } else if power < 0.88 {
        "5-6"
    } else if power < 0.93 {
        "6-7"
    } else if power < 1.06 {
        "7-8"
    } else if power < 1.21 {
        "9"
    } else {
        "10"
    }
}

/// %FTP range of the zone containing `power`
pub fn zone_range_for_power(power: f64) -> &'static str {
    if power < 0.55 {
        "<55%"
    } else if power < 0.76 {
        "56-75%"
    } else if power < 0.88 {
        "76-87%"
    } else if power < 0.93 {
        "88-92%"
    } else if power < 1.06 {
        "93-105%"
    } else if power < 1.21 {
        "106-120%"
    } else if power < 1.51 {
        "121-150%"
    } else {
        ">150%"
    }
}

/// A cue and the reason for it, e.g. ("85-95rpm", "race cadence")
pub type Cue = (&'static str, &'static str);

pub fn cadence(pattern: SessionPattern) -> Option<Cue> {
    use Archetype::*;
    let cue = match pattern {
        SessionPattern::Archetype(a) => match a {
            Vo2Steady => ("90-100rpm", "high turnover for VO2max efficiency"),
            Vo2ThirtyThirty => ("90-100rpm", "high turnover maintains power through fatigue"),
            Vo2FortyTwenty => ("90-100rpm", "high turnover for repeated efforts"),
            Vo2Extended => ("90-100rpm", "high turnover sustains longer intervals"),
            ThresholdSteady => ("85-95rpm", "race cadence"),
            ThresholdProgressive => ("85-95rpm", "sustainable race cadence"),
            ThresholdTouch => ("85-95rpm", "race pace feel"),
            MixedClimbing => ("70-80rpm", "climbing simulation"),
            MixedIntervals => ("85-95rpm", "variable as terrain demands"),
            Sfr => ("50-60rpm", "force development"),
            Tempo => ("85-95rpm", "sustainable rhythm"),
            GSpot => ("85-95rpm", "sustainable sweet spot cadence"),
            Stomps => ("50-60rpm start, accelerate through", "max torque development"),
            Microbursts => ("100-110rpm", "high leg speed"),
            RaceSimulation => ("variable", "match race demands"),
            NormalizedPower => ("variable", "match terrain and strategy"),
            Endurance => ("self-selected", "comfortable endurance cadence"),
            Testing => ("self-selected", "natural test cadence"),
            Rest => return None,
        },
        SessionPattern::EnduranceBlocks => ("self-selected", "comfortable endurance cadence"),
        SessionPattern::Vo2Bookend => (
            "90-100rpm (intervals), self-selected (Z2)",
            "high turnover for VO2, comfortable for endurance",
        ),
        SessionPattern::TempoAccelerations => (
            "85-95rpm (tempo), 100+ rpm (accelerations)",
            "sustainable tempo with high-cadence bursts",
        ),
        SessionPattern::ThresholdAccumulation => ("85-95rpm", "race cadence for threshold work"),
        SessionPattern::CadenceWork => ("105-115rpm", "high cadence leg speed development"),
        SessionPattern::BlendedVo2Gspot => (
            "90-100rpm (VO2), 85-95rpm (SS)",
            "high turnover for VO2, sustainable for SS",
        ),
        SessionPattern::General => ("85-95rpm", "comfortable training cadence"),
    };
    Some(cue)
}

pub fn position(pattern: SessionPattern) -> Option<Cue> {
    use Archetype::*;
    let cue = match pattern {
        SessionPattern::Archetype(a) => match a {
            Vo2Steady => ("Seated, hoods", "stable power platform"),
            Vo2ThirtyThirty => ("Seated, hoods", "quick recovery position"),
            Vo2FortyTwenty => ("Seated, hoods", "power efficiency"),
            Vo2Extended => ("Seated, hoods", "sustained effort position"),
            ThresholdSteady => ("Seated, drops or hoods", "race position"),
            ThresholdProgressive => ("Seated, drops or hoods", "build into aero"),
            ThresholdTouch => ("Seated, hoods", "controlled effort"),
            MixedClimbing => ("Seated, hoods", "climbing efficiency"),
            MixedIntervals => ("Seated, hoods or drops", "terrain-dependent"),
            Sfr => ("Seated, hoods", "torque focus"),
            Tempo => ("Alternating hoods/drops", "position practice"),
            GSpot => ("Seated, hoods", "sustainable position"),
            Stomps => ("Seated to standing", "power development"),
            Microbursts => ("Seated, hoods", "quick turnover"),
            RaceSimulation => ("Race position", "full race gear"),
            NormalizedPower => (
                "Variable",
                "match terrain demands - hard on uphills, easier on downhills",
            ),
            Endurance => ("Alternating", "comfort and position practice"),
            Testing => ("Seated, hoods", "consistent test position"),
            Rest => return None,
        },
        SessionPattern::EnduranceBlocks => ("Alternating", "comfort and position practice"),
        SessionPattern::Vo2Bookend => (
            "Seated, hoods (intervals), alternating (Z2)",
            "stable for VO2, varied for endurance",
        ),
        SessionPattern::TempoAccelerations => (
            "Alternating in/out of saddle",
            "position changes during accelerations",
        ),
        SessionPattern::ThresholdAccumulation => {
            ("Seated, drops or hoods", "race position for threshold")
        }
        SessionPattern::CadenceWork => ("Seated, hoods", "focus on leg speed, not position"),
        SessionPattern::BlendedVo2Gspot => {
            ("Seated, hoods", "sustainable position for both intensities")
        }
        SessionPattern::General => ("Seated, hoods", "training position"),
    };
    Some(cue)
}

/// Base purpose narrative
pub fn purpose(pattern: SessionPattern) -> &'static str {
    use Archetype::*;
    match pattern {
        SessionPattern::Archetype(a) => match a {
            Vo2Steady => "VO2max development. Maximum aerobic power—the engine that drives race-winning attacks and sustained high-intensity efforts.",
            Vo2ThirtyThirty => "Broken VO2 accumulation. More time at max aerobic power than steady intervals allow. The short recovery keeps you in the productive zone longer.",
            Vo2FortyTwenty => "Repeated high-intensity efforts. Builds the ability to attack, recover, and attack again—essential for racing dynamics.",
            Vo2Extended => "Extended VO2max intervals. Pushing deeper into the aerobic ceiling. These longer efforts build both power and mental toughness.",
            ThresholdSteady => "Threshold development. Raising the power you can sustain for 20-60 minutes—the foundation of race-pace performance.",
            ThresholdProgressive => "Progressive threshold work. Building into effort teaches pacing and race-day strategy.",
            ThresholdTouch => "Threshold maintenance. Brief threshold work to maintain race-pace feel without excessive recovery cost.",
            MixedClimbing => "Mixed climbing simulation. Tempo base with threshold surges—the pattern you'll feel on every rolling climb where the gradient keeps changing.",
            MixedIntervals => "Mixed intensity intervals. VO2 to threshold transitions simulate race demands where efforts layer on each other.",
            Sfr => "Force development. Low cadence builds the torque for steep grades and tired legs late in the race.",
            Tempo => "Aerobic endurance. The bread and butter of sustainable race-day power. Building the engine that never quits.",
            GSpot => "Sweet spot work. Maximum aerobic stimulus for minimum recovery cost. The most efficient zone for building race fitness.",
            Stomps => "Neuromuscular power. Max torque from a near-stop builds the explosive power for steep pitches and accelerations.",
            Microbursts => "Leg speed development. High-cadence bursts build the snap for attacks and pace changes.",
            RaceSimulation => "Race simulation. Practicing race-day execution—pacing, fueling, mental strategies. This is dress rehearsal.",
            NormalizedPower => "Normalized Power (NP) and Intensity Factor (IF) training. Target IF of 0.85 for the duration. How you achieve it is up to you—high average power, hard on uphills, easier on downhills. This teaches race-pace management and power distribution across variable terrain.",
            Endurance => "Aerobic base building. Easy riding builds mitochondrial density and fat oxidation—the foundation everything else rests on.",
            Testing => "Assessment and baseline. Accurate testing sets accurate training zones. Today's numbers guide tomorrow's training.",
            Rest => "Recovery. Adaptation happens during rest. Trust the process.",
        },
        SessionPattern::EnduranceBlocks => "Structured aerobic endurance. Block intervals at high Z2/low Z3 build aerobic capacity while allowing brief recovery. This format tests and extends your aerobic limit—the power you can sustain for hours.",
        SessionPattern::Vo2Bookend => "VO2 bookend training. VO2 intervals at the start and end maintain high-intensity stimulus while the long Z2 block in the middle builds endurance. This structure simulates race demands where you need power at the start and finish.",
        SessionPattern::TempoAccelerations => "Tempo with accelerations. Sustained tempo work with periodic short bursts builds the ability to maintain race pace while responding to attacks and terrain changes. Position alternation adds race-specific demands.",
        SessionPattern::ThresholdAccumulation => "Threshold accumulation. Many short threshold intervals with brief recovery build high-volume threshold work. This format accumulates more time at threshold than longer intervals allow, building race-pace endurance.",
        SessionPattern::CadenceWork => "Cadence development. High-cadence accelerations (>105rpm) build leg speed and neuromuscular coordination. Power falls where it does, but maintain Z3 minimum—focus is on turnover, not power.",
        SessionPattern::BlendedVo2Gspot => "Blended VO2max and G Spot. Combines 30/30 VO2 intervals with sweet spot work in the same session. This format builds both max aerobic power and sustainable race pace in one efficient workout.",
        SessionPattern::General => "Quality training. Building race-specific fitness through structured work.",
    }
}

const LEVEL_ADDITIONS: [&str; 6] = [
    "Introduction to the pattern. Focus on execution quality over power targets.",
    "Building volume. Same pattern, more work. The fitness is in the accumulation.",
    "Cadence and position focus. Same structure—now refine the execution.",
    "Consolidation. Let the body absorb the previous weeks' work. Quality over ambition.",
    "Extended sets. More work per set. This is where real adaptations lock in.",
    "Peak volume. Maximum training load. You're building the capacity race day demands.",
];

const NORMALIZED_POWER_ADDITIONS: [&str; 6] = [
    "Introduction to NP/IF training. Target IF 0.85 for 2 hours. Focus on understanding how variable power affects NP.",
    "Building duration. Target IF 0.85 for 2.5 hours. Experiment with different strategies (high average vs. variable).",
    "Refining strategy. Target IF 0.85 for 2.5 hours. Focus on optimizing power distribution across terrain.",
    "Consolidation. Target IF 0.85 for 2 hours. Let the body absorb the previous weeks' work.",
    "Extended duration. Target IF 0.85 for 3 hours. This is where real race-pace management skills develop.",
    "Peak duration. Target IF 0.85 for 3 hours. Maximum training load for race-pace management.",
];

/// Level-specific sentence appended to the purpose, if this pattern has one
pub fn level_addition(pattern: SessionPattern, level: u8) -> Option<&'static str> {
    let index = usize::from(level).checked_sub(1).filter(|i| *i < 6)?;
    if pattern.is(Archetype::NormalizedPower) {
        return Some(NORMALIZED_POWER_ADDITIONS[index]);
    }
    let exempt = [Archetype::Rest, Archetype::Testing, Archetype::Endurance];
    if exempt.iter().any(|a| pattern.is(*a)) {
        return None;
    }
    Some(LEVEL_ADDITIONS[index])
}

/// Purpose with its level addition, e.g. "...\n\nLevel 2: Building volume..."
pub fn progression_purpose(pattern: SessionPattern, level: u8) -> String {
    let base = purpose(pattern);
    match level_addition(pattern, level) {
        Some(addition) => format!("{}\n\nLevel {}: {}", base, level, addition),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpe_boundaries() {
        assert_eq!(rpe_for_power(0.5), "1-2");
        assert_eq!(rpe_for_power(0.55), "3-4");
        assert_eq!(rpe_for_power(0.65), "3-4");
        assert_eq!(rpe_for_power(0.85), "5-6");
        assert_eq!(rpe_for_power(0.90), "6-7");
        assert_eq!(rpe_for_power(1.0), "7-8");
        assert_eq!(rpe_for_power(1.1), "9");
        assert_eq!(rpe_for_power(1.25), "10");
    }

    #[test]
    fn test_zone_ranges() {
        assert_eq!(zone_range_for_power(0.5), "<55%");
        assert_eq!(zone_range_for_power(0.7), "56-75%");
        assert_eq!(zone_range_for_power(0.88), "88-92%");
        assert_eq!(zone_range_for_power(1.1), "106-120%");
        assert_eq!(zone_range_for_power(1.5), "121-150%");
        assert_eq!(zone_range_for_power(2.0), ">150%");
    }

    #[test]
    fn test_rest_has_no_cues() {
        let rest = SessionPattern::Archetype(Archetype::Rest);
        assert!(cadence(rest).is_none());
        assert!(position(rest).is_none());
        assert_eq!(
            cadence(SessionPattern::Archetype(Archetype::Sfr)),
            Some(("50-60rpm", "force development"))
        );
    }

    #[test]
    fn test_progression_purpose() {
        let tempo = progression_purpose(Archetype::Tempo.into(), 2);
        assert!(tempo.starts_with("Aerobic endurance."));
        assert!(tempo.ends_with("Level 2: Building volume. Same pattern, more work. The fitness is in the accumulation."));

        let np = progression_purpose(Archetype::NormalizedPower.into(), 5);
        assert!(np.contains("Level 5: Extended duration. Target IF 0.85 for 3 hours."));

        let endurance = progression_purpose(Archetype::Endurance.into(), 3);
        assert!(!endurance.contains("Level"));

        let general = progression_purpose(SessionPattern::General, 9);
        assert_eq!(general, purpose(SessionPattern::General));
    }
}
