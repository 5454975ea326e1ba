use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::archetype::Archetype;

/// Session pattern recognised from a workout name.
///
/// A superset of [`Archetype`]: plan templates use a few hybrid sessions
/// that have no progression table of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPattern {
    Archetype(Archetype),
    EnduranceBlocks,
    Vo2Bookend,
    TempoAccelerations,
    ThresholdAccumulation,
    CadenceWork,
    BlendedVo2Gspot,
    General,
}

impl SessionPattern {
    pub fn key(&self) -> &'static str {
        match self {
            SessionPattern::Archetype(a) => a.key(),
            SessionPattern::EnduranceBlocks => "endurance_blocks",
            SessionPattern::Vo2Bookend => "vo2_bookend",
            SessionPattern::TempoAccelerations => "tempo_accelerations",
            SessionPattern::ThresholdAccumulation => "threshold_accumulation",
            SessionPattern::CadenceWork => "cadence_work",
            SessionPattern::BlendedVo2Gspot => "blended_vo2_gspot",
            SessionPattern::General => "general",
        }
    }

    pub fn is(&self, archetype: Archetype) -> bool {
        *self == SessionPattern::Archetype(archetype)
    }
}

impl From<Archetype> for SessionPattern {
    fn from(archetype: Archetype) -> Self {
        SessionPattern::Archetype(archetype)
    }
}

impl fmt::Display for SessionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Name patterns, checked in order; the first match wins
const PATTERNS: &[(SessionPattern, &[&str])] = {
    use Archetype::*;
    use SessionPattern as P;
    &[
        (P::Archetype(Vo2Steady), &[r"VO2max\s+Intervals?", r"VO2max\s+Development", r"\d+x\d+\s*min.*VO2"]),
        (P::Archetype(Vo2ThirtyThirty), &[r"30/30", r"30-30"]),
        (P::Archetype(Vo2FortyTwenty), &[r"40/20", r"40-20", r"Broken\s+VO2"]),
        (P::Archetype(Vo2Extended), &[r"Extended\s+VO2max"]),
        (
            P::Archetype(ThresholdSteady),
            &[
                r"Threshold\s+Intervals?",
                r"Threshold\s+Development",
                r"Steady\s+Threshold",
                r"Threshold\s+Progression",
            ],
        ),
        (P::Archetype(ThresholdProgressive), &[r"Progressive\s+Threshold"]),
        (P::Archetype(ThresholdTouch), &[r"Threshold\s+Touch"]),
        (P::Archetype(MixedClimbing), &[r"Mixed\s+Climbing", r"Climbing\s+O/U", r"Over.?Under.*Climb"]),
        (P::Archetype(MixedIntervals), &[r"Mixed\s+Intervals?", r"Mixed.*VO2.*Threshold"]),
        (P::Archetype(Sfr), &[r"SFR", r"Force\s+Development", r"Low\s+Cadence\s+Force"]),
        (P::Archetype(Tempo), &[r"Tempo\s+", r"Steady\s+Tempo"]),
        (P::Archetype(GSpot), &[r"G-?Spot", r"Sweet\s+Spot"]),
        (P::Archetype(Stomps), &[r"Stomps?", r"Max\s+Torque"]),
        (P::Archetype(Microbursts), &[r"Microburst", r"15/15"]),
        (P::Archetype(RaceSimulation), &[r"Race\s+Simulation", r"Race\s+Sim"]),
        (
            P::Archetype(NormalizedPower),
            &[
                r"Normalized\s+Power",
                r"NP\s+Workout",
                r"IF\s+Target",
                r"Intensity\s+Factor",
                r"NP.*IF",
                r"IF.*0\.85",
                r"NP.*0\.85",
            ],
        ),
        (P::Archetype(Endurance), &[r"Endurance", r"Easy\s+Aerobic", r"Long\s+Aerobic", r"Z[12]\s+"]),
        (P::EnduranceBlocks, &[r"Endurance\s+\+", r"Endurance\s+Blocks", r"Structured\s+Endurance"]),
        (P::Archetype(Testing), &[r"FTP\s+Test", r"Assessment", r"Power\s+Profile", r"Testing"]),
        (P::Archetype(Rest), &[r"^Rest", r"Rest\s+Day", r"Recovery\s+Day"]),
        (P::Vo2Bookend, &[r"VO2\s+Bookend", r"Bookend.*VO2"]),
        (P::TempoAccelerations, &[r"UnSteady", r"Tempo.*Acceleration", r"Tempo.*Surge"]),
        (
            P::ThresholdAccumulation,
            &[r"Fish\s+and\s+Chips", r"Threshold\s+Accumulation", r"\d+x\d+\s*min.*Z4"],
        ),
        (
            P::CadenceWork,
            &[r"Cadence\s+Clown", r"Cadence\s+Work", r"High\s+Cadence.*Acceleration"],
        ),
        (
            P::BlendedVo2Gspot,
            &[r"Buffers.*30/30", r"Blended.*VO2.*G\s*Spot", r"30/30.*Bookend.*SS"],
        ),
    ]
};

static COMPILED: Lazy<Vec<(SessionPattern, Vec<Regex>)>> = Lazy::new(|| {
    PATTERNS
        .iter()
        .map(|(pattern, sources)| {
            let regexes = sources
                .iter()
                .map(|src| {
                    RegexBuilder::new(src)
                        .case_insensitive(true)
                        .build()
                        .expect("Valid regex pattern")
                })
                .collect();
            (*pattern, regexes)
        })
        .collect()
});

/// Recognise the session pattern from a workout name
pub fn detect_pattern(workout_name: &str) -> SessionPattern {
    let found = COMPILED
        .iter()
        .find(|(_, regexes)| regexes.iter().any(|re| re.is_match(workout_name)))
        .map(|(pattern, _)| *pattern);
    if let Some(pattern) = found {
        return pattern;
    }

    let upper = workout_name.to_uppercase();
    if ["EASY", "Z1", "Z2"].iter().any(|k| upper.contains(k)) {
        SessionPattern::Archetype(Archetype::Endurance)
    } else if ["HARD", "QUALITY"].iter().any(|k| upper.contains(k)) {
        SessionPattern::Archetype(Archetype::ThresholdSteady)
    } else {
        SessionPattern::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_archetypes() {
        assert!(detect_pattern("W02 Tue - VO2max Intervals").is(Archetype::Vo2Steady));
        assert!(detect_pattern("W04 Thu - 30/30s").is(Archetype::Vo2ThirtyThirty));
        assert!(detect_pattern("Level 3 - G-Spot / Sweet Spot").is(Archetype::GSpot));
        assert!(detect_pattern("W07 Sat - Normalized Power Ride").is(Archetype::NormalizedPower));
        assert!(detect_pattern("Rest Day").is(Archetype::Rest));
        assert!(detect_pattern("W01 Mon - rest day").is(Archetype::Rest));
    }

    #[test]
    fn test_order_decides_overlaps() {
        // "Endurance" is listed before "Endurance Blocks"
        assert!(detect_pattern("Structured Endurance Blocks").is(Archetype::Endurance));
        assert_eq!(detect_pattern("W06 Wed - Fish and Chips"), SessionPattern::ThresholdAccumulation);
        // "30/30" is listed before the blended pattern
        assert!(detect_pattern("Buffers 30/30").is(Archetype::Vo2ThirtyThirty));
    }

    #[test]
    fn test_keyword_fallbacks() {
        assert!(detect_pattern("W03 Wed - Easy Spin").is(Archetype::Endurance));
        assert!(detect_pattern("W03 Thu - Hard Session").is(Archetype::ThresholdSteady));
        assert_eq!(detect_pattern("W03 Fri - Openers"), SessionPattern::General);
    }

    #[test]
    fn test_every_archetype_name_detects_itself() {
        for archetype in Archetype::ALL {
            let name = archetype.display_name();
            let detected = detect_pattern(name);
            match archetype {
                // Catalogue names that none of the name patterns cover
                Archetype::Vo2Steady
                | Archetype::Vo2Extended
                | Archetype::ThresholdSteady
                | Archetype::ThresholdProgressive
                | Archetype::Tempo => assert_eq!(detected, SessionPattern::General, "{}", name),
                _ => assert!(detected.is(archetype), "{} -> {}", name, detected),
            }
        }
    }
}
