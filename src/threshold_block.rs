//! Four-week double-threshold block
//!
//! Two threshold days a week. Tuesday is accumulation (many 3-minute reps,
//! one more each week); Thursday is either the steady session or its
//! progressive alternative. Sessions need 48 hours between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::archetype::{format_power, Steady};
use crate::error::{DataError, Result};
use crate::zwo::{parse_blocks, ZwoDocument};

pub const BLOCK_WEEKS: u8 = 4;

const WARMUP: &str = r#"    <Warmup Duration="600" PowerLow="0.50" PowerHigh="0.65"/>
    <SteadyState Duration="300" Power="0.85" Cadence="100"/>"#;
const COOLDOWN: &str = r#"    <Cooldown Duration="600" PowerLow="0.50" PowerHigh="0.65"/>"#;

const WARMUP_TEXT: &str = "WARM-UP:\n\
• 10min building from Z1 to Z2 (RPE 3-4)\n\
• 5min high cadence Z3 (100+ rpm) to prime efforts (RPE 5-6)";
const COOLDOWN_TEXT: &str = "COOL-DOWN:\n• 10min easy spin Z1-Z2 (RPE 3-4)";
const THRESHOLD_CUES: &str = "• Cadence: 85-95rpm (race cadence for threshold work)\n\
• Position: Seated, drops or hoods";

/// Z2 float between threshold reps
const REP_RECOVERY: Steady = Steady::new(300, 0.70);

/// Suggested week around the two threshold days
pub const WEEKLY_LAYOUT: [(&str, &str); 7] = [
    ("Monday", "Rest or easy Z1/Z2 (30-60min)"),
    ("Tuesday", "Threshold Accumulation"),
    ("Wednesday", "Easy Z1/Z2 (60-90min) or rest"),
    ("Thursday", "Threshold Steady or Threshold Progressive"),
    ("Friday", "Rest or easy Z1/Z2 (30-60min)"),
    ("Saturday", "Long Z2 endurance (2-4 hours)"),
    ("Sunday", "Easy Z1/Z2 (60-90min) or rest"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSession {
    Accumulation,
    Steady,
    /// Alternative to the steady session
    Progressive,
}

impl ThresholdSession {
    pub const ALL: [ThresholdSession; 3] = [
        ThresholdSession::Accumulation,
        ThresholdSession::Steady,
        ThresholdSession::Progressive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ThresholdSession::Accumulation => "Threshold Accumulation",
            ThresholdSession::Steady => "Threshold Steady",
            ThresholdSession::Progressive => "Threshold Progressive",
        }
    }

    /// Reps and minutes per rep for a week of the block
    pub fn dosage(&self, week: u8) -> Dosage {
        let week = u32::from(week);
        match self {
            ThresholdSession::Accumulation => Dosage::new(11 + week, 3),
            ThresholdSession::Steady if week >= u32::from(BLOCK_WEEKS) => Dosage::new(2, 15),
            ThresholdSession::Steady => Dosage::new(3, 9 + week),
            // two sets of 10min @ 95% into 10min @ 100%
            ThresholdSession::Progressive => Dosage::new(2, 20),
        }
    }
}

impl fmt::Display for ThresholdSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dosage {
    pub reps: u32,
    pub minutes: u32,
}

impl Dosage {
    const fn new(reps: u32, minutes: u32) -> Self {
        Self { reps, minutes }
    }
}

impl fmt::Display for Dosage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}min", self.reps, self.minutes)
    }
}

/// One session in one week of the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWorkout {
    pub session: ThresholdSession,
    pub week: u8,
}

impl BlockWorkout {
    pub fn new(session: ThresholdSession, week: u8) -> Result<Self> {
        if !(1..=BLOCK_WEEKS).contains(&week) {
            return Err(DataError::InvalidBlockWeek {
                week,
                weeks: BLOCK_WEEKS,
            }
            .into());
        }
        Ok(Self { session, week })
    }

    pub fn dosage(&self) -> Dosage {
        self.session.dosage(self.week)
    }

    pub fn name(&self) -> String {
        format!("Week {} - {} ({})", self.week, self.session, self.dosage())
    }

    pub fn filename(&self) -> String {
        let dosage = self.dosage();
        format!(
            "Week_{}_{}_{}x{}min.zwo",
            self.week,
            self.session.label().replace(' ', "_"),
            dosage.reps,
            dosage.minutes
        )
    }

    /// Block elements between warm-up and cool-down
    fn main_set(&self) -> Vec<String> {
        let dosage = self.dosage();
        match self.session {
            ThresholdSession::Accumulation => vec![format!(
                r#"    <IntervalsT Repeat="{}" OnDuration="180" OnPower="{}" OffDuration="60" OffPower="{}"/>"#,
                dosage.reps,
                format_power(1.0),
                format_power(0.70)
            )],
            ThresholdSession::Steady => {
                let work = Steady::new(dosage.minutes * 60, 1.0);
                with_recoveries(dosage.reps, &[work])
            }
            ThresholdSession::Progressive => {
                let ramp = [Steady::new(600, 0.95), Steady::new(600, 1.0)];
                with_recoveries(dosage.reps, &ramp)
            }
        }
    }

    pub fn fragment(&self) -> String {
        let mut lines = vec![WARMUP.to_string()];
        lines.extend(self.main_set());
        lines.push(COOLDOWN.to_string());
        lines.join("\n")
    }

    pub fn description(&self) -> String {
        let dosage = self.dosage();
        let (main_set, purpose, execution) = match self.session {
            ThresholdSession::Accumulation => (
                format!(
                    "• {}×3min @ 93-105% FTP, RPE 7-8 (1min Z2 recovery, RPE 3-4)",
                    dosage.reps
                ),
                format!(
                    "Threshold accumulation. Short reps with short floats pile up more time at threshold than long intervals allow, building race-pace endurance. Week {} of {}.",
                    self.week, BLOCK_WEEKS
                ),
                "• Hold the same power on every rep\n\
                 • If power fades more than 5% late in the set, trim volume next session\n\
                 • The recovery minute should feel easy",
            ),
            ThresholdSession::Steady => {
                let week_note = if self.week == BLOCK_WEEKS {
                    "Final week: fewer, longer reps to lock in the block.".to_string()
                } else {
                    format!("Week {} of {}.", self.week, BLOCK_WEEKS)
                };
                (
                    format!(
                        "• {} @ 93-105% FTP, RPE 7-8 (5min Z2 recovery, RPE 3-4)",
                        dosage
                    ),
                    format!(
                        "Sustained threshold. Long reps teach you to hold threshold power on tired legs, which is what a gravel race asks for. {}",
                        week_note
                    ),
                    "• Start conservatively and finish the last rep as strong as the first\n\
                     • If you cannot complete every rep, shorten them next session\n\
                     • Smooth, controlled power with no surges",
                )
            }
            ThresholdSession::Progressive => (
                "• 2 sets of: (10min @ 88-92% FTP, RPE 6-7 → 10min @ 93-105% FTP, RPE 7-8)\n\
                 • 5min Z2 recovery between sets (RPE 3-4)"
                    .to_string(),
                "Threshold progressive. Building into threshold teaches pacing and banks more time at threshold than starting at 100%. It rehearses lifting the effort over a long climb or a rough sector.".to_string(),
                "• 95% FTP should feel manageable\n\
                 • Step up to 100% FTP smoothly, not with a jump\n\
                 • Hold power through the transition",
            ),
        };

        format!(
            "{}\n\nMAIN SET:\n{}\n{}\n\n{}\n\nPURPOSE:\n{}\n\nEXECUTION:\n{}",
            WARMUP_TEXT, main_set, THRESHOLD_CUES, COOLDOWN_TEXT, purpose, execution
        )
    }

    pub fn document(&self, author: &str) -> Result<ZwoDocument> {
        let blocks = parse_blocks(&self.fragment())?;
        Ok(ZwoDocument::new(self.name(), self.description(), blocks).with_author(author))
    }
}

/// `reps` copies of `work` with a Z2 recovery between copies
fn with_recoveries(reps: u32, work: &[Steady]) -> Vec<String> {
    let mut lines = Vec::new();
    for rep in 0..reps {
        lines.extend(work.iter().map(Steady::render));
        if rep + 1 < reps {
            lines.push(REP_RECOVERY.render());
        }
    }
    lines
}

/// Every session for every week, session by session
pub fn block_workouts() -> Vec<BlockWorkout> {
    ThresholdSession::ALL
        .iter()
        .flat_map(|&session| (1..=BLOCK_WEEKS).map(move |week| BlockWorkout { session, week }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::zwo::check_zwo;
    use crate::zwo::BlockKind;

    fn workout(session: ThresholdSession, week: u8) -> BlockWorkout {
        BlockWorkout::new(session, week).unwrap()
    }

    #[test]
    fn test_accumulation_adds_a_rep_each_week() {
        let reps: Vec<u32> = (1..=BLOCK_WEEKS)
            .map(|w| workout(ThresholdSession::Accumulation, w).dosage().reps)
            .collect();
        assert_eq!(reps, vec![12, 13, 14, 15]);

        let w1 = workout(ThresholdSession::Accumulation, 1);
        assert_eq!(
            w1.fragment(),
            r#"    <Warmup Duration="600" PowerLow="0.50" PowerHigh="0.65"/>
    <SteadyState Duration="300" Power="0.85" Cadence="100"/>
    <IntervalsT Repeat="12" OnDuration="180" OnPower="1.0" OffDuration="60" OffPower="0.7"/>
    <Cooldown Duration="600" PowerLow="0.50" PowerHigh="0.65"/>"#
        );
        assert_eq!(w1.name(), "Week 1 - Threshold Accumulation (12×3min)");
        assert_eq!(w1.filename(), "Week_1_Threshold_Accumulation_12x3min.zwo");
        assert_eq!(w1.document("Coach").unwrap().duration_seconds(), 900 + 12 * 240 + 600);
    }

    #[test]
    fn test_steady_progression_and_final_week() {
        let dosages: Vec<(u32, u32)> = (1..=BLOCK_WEEKS)
            .map(|w| {
                let d = workout(ThresholdSession::Steady, w).dosage();
                (d.reps, d.minutes)
            })
            .collect();
        assert_eq!(dosages, vec![(3, 10), (3, 11), (3, 12), (2, 15)]);

        let week4 = workout(ThresholdSession::Steady, 4);
        let doc = week4.document("Coach").unwrap();
        let work: Vec<u32> = doc
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::SteadyState && b.attr_f64("Power") == Some(1.0))
            .map(|b| b.duration())
            .collect();
        assert_eq!(work, vec![900, 900]);
        assert!(doc.description.contains("2×15min @ 93-105% FTP"));
        assert!(doc.description.contains("Final week"));
    }

    #[test]
    fn test_progressive_sets() {
        let doc = workout(ThresholdSession::Progressive, 2).document("Coach").unwrap();
        let powers: Vec<f64> = doc
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::SteadyState)
            .filter_map(|b| b.attr_f64("Power"))
            .collect();
        assert_eq!(powers, vec![0.85, 0.95, 1.0, 0.7, 0.95, 1.0]);
        assert_eq!(doc.name, "Week 2 - Threshold Progressive (2×20min)");
    }

    #[test]
    fn test_week_outside_block() {
        assert!(BlockWorkout::new(ThresholdSession::Steady, 0).is_err());
        assert!(BlockWorkout::new(ThresholdSession::Steady, 5).is_err());
    }

    #[test]
    fn test_every_block_workout_validates_cleanly() {
        let workouts = block_workouts();
        assert_eq!(workouts.len(), 12);
        for w in workouts {
            let xml = w.document("Coach").unwrap().to_xml().unwrap();
            let findings = check_zwo(&w.filename(), &xml);
            assert!(findings.is_empty(), "{}: {:?}", w.name(), findings);
        }
    }
}
