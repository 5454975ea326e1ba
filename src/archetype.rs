//! Workout archetypes and their six-level progressions
//!
//! Each archetype maps a progression level (1-6) to fixed interval
//! parameters. [`generate_blocks`] renders them as the ZWO block elements
//! that sit inside `<workout>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, GravelKitError, Result};

const WARMUP: &str = r#"    <Warmup Duration="900" PowerLow="0.50" PowerHigh="0.75"/>"#;
const COOLDOWN: &str = r#"    <Cooldown Duration="600" PowerLow="0.50" PowerHigh="0.65"/>"#;

/// Recovery between sets and steady blocks
const SET_RECOVERY: Steady = Steady::new(180, 0.55);

/// Named interval-workout pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Vo2Steady,
    #[serde(rename = "vo2_30_30")]
    Vo2ThirtyThirty,
    #[serde(rename = "vo2_40_20")]
    Vo2FortyTwenty,
    Vo2Extended,
    ThresholdSteady,
    ThresholdProgressive,
    ThresholdTouch,
    MixedClimbing,
    MixedIntervals,
    Sfr,
    Tempo,
    GSpot,
    Stomps,
    Microbursts,
    RaceSimulation,
    NormalizedPower,
    Endurance,
    Testing,
    Rest,
}

impl Archetype {
    /// All archetypes in catalogue order
    pub const ALL: [Archetype; 19] = [
        Archetype::Vo2Steady,
        Archetype::Vo2ThirtyThirty,
        Archetype::Vo2FortyTwenty,
        Archetype::Vo2Extended,
        Archetype::ThresholdSteady,
        Archetype::ThresholdProgressive,
        Archetype::ThresholdTouch,
        Archetype::MixedClimbing,
        Archetype::MixedIntervals,
        Archetype::Sfr,
        Archetype::Tempo,
        Archetype::GSpot,
        Archetype::Stomps,
        Archetype::Microbursts,
        Archetype::RaceSimulation,
        Archetype::NormalizedPower,
        Archetype::Endurance,
        Archetype::Testing,
        Archetype::Rest,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Archetype::Vo2Steady => "vo2_steady",
            Archetype::Vo2ThirtyThirty => "vo2_30_30",
            Archetype::Vo2FortyTwenty => "vo2_40_20",
            Archetype::Vo2Extended => "vo2_extended",
            Archetype::ThresholdSteady => "threshold_steady",
            Archetype::ThresholdProgressive => "threshold_progressive",
            Archetype::ThresholdTouch => "threshold_touch",
            Archetype::MixedClimbing => "mixed_climbing",
            Archetype::MixedIntervals => "mixed_intervals",
            Archetype::Sfr => "sfr",
            Archetype::Tempo => "tempo",
            Archetype::GSpot => "g_spot",
            Archetype::Stomps => "stomps",
            Archetype::Microbursts => "microbursts",
            Archetype::RaceSimulation => "race_simulation",
            Archetype::NormalizedPower => "normalized_power",
            Archetype::Endurance => "endurance",
            Archetype::Testing => "testing",
            Archetype::Rest => "rest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Archetype::Vo2Steady => "VO2max Steady Intervals",
            Archetype::Vo2ThirtyThirty => "VO2max 30/30",
            Archetype::Vo2FortyTwenty => "VO2max 40/20",
            Archetype::Vo2Extended => "VO2max Extended",
            Archetype::ThresholdSteady => "Threshold Steady",
            Archetype::ThresholdProgressive => "Threshold Progressive",
            Archetype::ThresholdTouch => "Threshold Touch",
            Archetype::MixedClimbing => "Mixed Climbing",
            Archetype::MixedIntervals => "Mixed Intervals",
            Archetype::Sfr => "SFR - Sustained Force Repetitions",
            Archetype::Tempo => "Tempo",
            Archetype::GSpot => "G-Spot / Sweet Spot",
            Archetype::Stomps => "Stomps",
            Archetype::Microbursts => "Microbursts",
            Archetype::RaceSimulation => "Race Simulation",
            Archetype::NormalizedPower => "Normalized Power / IF Target",
            Archetype::Endurance => "Endurance",
            Archetype::Testing => "FTP Test",
            Archetype::Rest => "Rest Day",
        }
    }

    /// Workout name used for example files, e.g. "Level 3 - Tempo"
    pub fn workout_name(&self, level: Level) -> String {
        format!("Level {} - {}", level, self.display_name())
    }

    /// Example filename: the key title-cased with underscores removed,
    /// e.g. `Level_2_Vo23030.zwo`
    pub fn example_filename(&self, level: Level) -> String {
        format!("Level_{}_{}.zwo", level, title_case(self.key()).replace('_', ""))
    }

    /// Folder holding this archetype's examples
    pub fn example_dir_name(&self) -> String {
        self.display_name().replace([' ', '/'], "_")
    }

    /// Parameters for one level
    pub fn params(&self, level: Level) -> MainSet {
        let i = level.index();
        match self {
            Archetype::Vo2Steady => {
                let reps = [3, 5, 5, 4, 3, 6][i];
                let on = if level.get() == 5 { 240 } else { 180 };
                MainSet::Intervals(
                    Repeat::new(reps, on, 1.1, on, 0.55).with_cadence_at(level, 3, (100, 110)),
                )
            }
            Archetype::Vo2ThirtyThirty => MainSet::Intervals(
                Repeat::new([8, 10, 10, 8, 12, 15][i], 30, 1.25, 30, 0.5)
                    .with_cadence_at(level, 3, (100, 110)),
            ),
            Archetype::Vo2FortyTwenty => MainSet::Intervals(
                Repeat::new([6, 8, 8, 6, 10, 12][i], 40, 1.2, 20, 0.5)
                    .with_cadence_at(level, 3, (100, 110)),
            ),
            Archetype::Vo2Extended => {
                let (reps, on) = [(2, 300), (3, 300), (3, 300), (2, 360), (2, 480), (3, 360)][i];
                MainSet::Intervals(
                    Repeat::new(reps, on, 1.1, on, 0.55).with_cadence_at(level, 3, (100, 110)),
                )
            }
            Archetype::ThresholdSteady => {
                let (reps, on) = [(2, 600), (3, 600), (3, 600), (2, 720), (2, 900), (3, 720)][i];
                MainSet::Intervals(
                    Repeat::new(reps, on, 1.0, 300, 0.55).with_position_at(level, 3, "drops"),
                )
            }
            Archetype::ThresholdProgressive => {
                let blocks = match level.get() {
                    1 | 4 => vec![Steady::new(600, 0.95), Steady::new(600, 1.0)],
                    2 | 3 => vec![Steady::new(720, 0.95), Steady::new(720, 1.02)],
                    5 => vec![Steady::new(900, 0.95), Steady::new(900, 1.02)],
                    _ => vec![
                        Steady::new(720, 0.95),
                        Steady::new(720, 1.02),
                        Steady::new(720, 0.95),
                        Steady::new(720, 1.02),
                    ],
                };
                MainSet::Progressive {
                    blocks,
                    position: (level.get() == 3).then_some("drops"),
                }
            }
            Archetype::ThresholdTouch => {
                let repeat = match level.get() {
                    1 => Repeat::new(1, 300, 1.0, 0, 0.0),
                    2 | 3 => Repeat::new(2, 300, 1.0, 300, 0.55),
                    4 => Repeat::new(1, 360, 1.0, 0, 0.0),
                    5 => Repeat::new(2, 360, 1.0, 300, 0.55),
                    _ => Repeat::new(2, 480, 1.0, 300, 0.55),
                };
                MainSet::Intervals(repeat.with_position_at(level, 3, "drops"))
            }
            Archetype::MixedClimbing => MainSet::OverUnder {
                sets: [3, 4, 4, 3, 5, 6][i],
                reps_per_set: 1,
                under: Steady::new(180, 0.88),
                over: Steady::new(60, 0.98),
                cadence: (level.get() == 3).then_some((70, 80)),
            },
            Archetype::MixedIntervals => MainSet::VoToThreshold {
                sets: [3, 4, 4, 3, 5, 6][i],
                vo2: Steady::new(120, 1.1),
                threshold: Steady::new(180, 0.98),
                position: (level.get() == 3).then_some("drops"),
            },
            Archetype::Sfr => {
                let (reps, on) = [(3, 180), (4, 180), (4, 180), (3, 240), (4, 240), (5, 240)][i];
                let mut repeat = Repeat::new(reps, on, 0.97, on, 0.55);
                repeat.cadence = Some((50, 60));
                MainSet::Intervals(repeat)
            }
            Archetype::Tempo => {
                let (count, duration) = [(1, 900), (3, 900), (3, 900), (2, 1200), (2, 1500), (3, 1200)][i];
                MainSet::SteadyBlocks {
                    blocks: vec![Steady::new(duration, 0.85); count],
                    position: (level.get() == 3).then_some("alternating"),
                }
            }
            Archetype::GSpot => {
                let (count, duration) = [(1, 600), (3, 600), (3, 600), (2, 720), (2, 900), (3, 720)][i];
                MainSet::SteadyBlocks {
                    blocks: vec![Steady::new(duration, 0.9); count],
                    position: (level.get() == 3).then_some("drops"),
                }
            }
            Archetype::Stomps => {
                let (reps, on) = [(4, 8), (6, 8), (6, 8), (4, 10), (6, 10), (8, 10)][i];
                MainSet::Intervals(
                    Repeat::new(reps, on, 2.0, 120, 0.5).with_position_at(level, 3, "standing"),
                )
            }
            Archetype::Microbursts => {
                let mut repeat = Repeat::new([10, 15, 15, 12, 18, 20][i], 15, 1.15, 15, 0.5);
                repeat.cadence = Some((100, 110));
                MainSet::Intervals(repeat)
            }
            Archetype::RaceSimulation => MainSet::RaceSimulation(
                [
                    RacePattern::Simple,
                    RacePattern::Extended,
                    RacePattern::Complex,
                    RacePattern::Simple,
                    RacePattern::ExtendedLong,
                    RacePattern::Full,
                ][i],
            ),
            Archetype::NormalizedPower => MainSet::NormalizedPower {
                minutes: [120, 150, 150, 120, 180, 180][i],
                intensity_factor: 0.85,
            },
            Archetype::Endurance => MainSet::Endurance {
                minutes: [60, 90, 120, 90, 150, 180][i],
                power: 0.7,
            },
            Archetype::Testing => MainSet::FtpTest,
            Archetype::Rest => MainSet::Rest,
        }
    }

    /// Block elements for one level, warmup and cooldown included
    pub fn blocks(&self, level: Level) -> String {
        let mut lines = vec![WARMUP.to_string()];
        self.params(level).render_into(&mut lines);
        lines.push(COOLDOWN.to_string());
        lines.join("\n")
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Archetype {
    type Err = GravelKitError;

    fn from_str(s: &str) -> Result<Self> {
        Archetype::ALL
            .iter()
            .copied()
            .find(|a| a.key() == s)
            .ok_or_else(|| {
                DataError::UnknownArchetype {
                    key: s.to_string(),
                }
                .into()
            })
    }
}

/// Progression level, 1 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Level(level))
        } else {
            Err(DataError::InvalidLevel { level }.into())
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    fn index(&self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN..=Self::MAX).map(Level)
    }
}

impl TryFrom<u8> for Level {
    type Error = GravelKitError;

    fn try_from(level: u8) -> Result<Self> {
        Level::new(level)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A steady block: duration in seconds at a fraction of FTP
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steady {
    pub duration: u32,
    pub power: f64,
}

impl Steady {
    pub const fn new(duration: u32, power: f64) -> Self {
        Self { duration, power }
    }

    pub(crate) fn render(&self) -> String {
        format!(
            r#"    <SteadyState Duration="{}" Power="{}"/>"#,
            self.duration,
            format_power(self.power)
        )
    }
}

/// A single `IntervalsT` repeat block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repeat {
    pub reps: u32,
    pub on_duration: u32,
    pub on_power: f64,
    pub off_duration: u32,
    pub off_power: f64,
    pub cadence: Option<(u32, u32)>,
    pub position: Option<&'static str>,
}

impl Repeat {
    fn new(reps: u32, on_duration: u32, on_power: f64, off_duration: u32, off_power: f64) -> Self {
        Self {
            reps,
            on_duration,
            on_power,
            off_duration,
            off_power,
            cadence: None,
            position: None,
        }
    }

    fn with_cadence_at(mut self, level: Level, at: u8, cadence: (u32, u32)) -> Self {
        if level.get() == at {
            self.cadence = Some(cadence);
        }
        self
    }

    fn with_position_at(mut self, level: Level, at: u8, position: &'static str) -> Self {
        if level.get() == at {
            self.position = Some(position);
        }
        self
    }

    fn render(&self) -> String {
        let cadence = self
            .cadence
            .map(|(low, high)| format!(r#" Cadence="{}" CadenceResting="{}""#, low, high))
            .unwrap_or_default();
        format!(
            r#"    <IntervalsT Repeat="{}" OnDuration="{}" OnPower="{}" OffDuration="{}" OffPower="{}"{}/>"#,
            self.reps,
            self.on_duration,
            format_power(self.on_power),
            self.off_duration,
            format_power(self.off_power),
            cadence
        )
    }
}

/// Fixed race-simulation sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePattern {
    Simple,
    Extended,
    Complex,
    ExtendedLong,
    Full,
}

impl RacePattern {
    fn lines(&self) -> Vec<&'static str> {
        const SURGE: &str = r#"    <SteadyState Duration="60" Power="1.10"/>"#;
        const SURGE_RECOVERY: &str = r#"    <SteadyState Duration="180" Power="0.70"/>"#;

        match self {
            RacePattern::Simple => vec![
                r#"    <SteadyState Duration="1200" Power="0.85"/>"#,
                SURGE,
                r#"    <SteadyState Duration="300" Power="0.70"/>"#,
                SURGE,
            ],
            RacePattern::Extended => {
                let mut lines = vec![r#"    <SteadyState Duration="1200" Power="0.85"/>"#];
                for _ in 0..4 {
                    lines.extend([SURGE, SURGE_RECOVERY]);
                }
                lines
            }
            RacePattern::Complex => vec![
                r#"    <SteadyState Duration="900" Power="0.85"/>"#,
                r#"    <SteadyState Duration="300" Power="1.00"/>"#,
                r#"    <SteadyState Duration="120" Power="1.15"/>"#,
                r#"    <SteadyState Duration="300" Power="0.70"/>"#,
            ],
            RacePattern::ExtendedLong => {
                let mut lines = vec![r#"    <SteadyState Duration="1800" Power="0.85"/>"#];
                for _ in 0..5 {
                    lines.extend([SURGE, SURGE_RECOVERY]);
                }
                lines
            }
            RacePattern::Full => vec![
                r#"    <SteadyState Duration="1800" Power="0.85"/>"#,
                r#"    <SteadyState Duration="600" Power="1.00"/>"#,
                r#"    <SteadyState Duration="180" Power="1.15"/>"#,
                r#"    <SteadyState Duration="300" Power="0.70"/>"#,
                r#"    <SteadyState Duration="300" Power="1.00"/>"#,
                r#"    <SteadyState Duration="120" Power="1.15"/>"#,
            ],
        }
    }
}

/// Main-set shape for one archetype level
#[derive(Debug, Clone, PartialEq)]
pub enum MainSet {
    Intervals(Repeat),
    /// Blocks in order, with one trailing recovery when there are more than two
    Progressive {
        blocks: Vec<Steady>,
        position: Option<&'static str>,
    },
    /// Each block followed by a recovery when there is more than one
    SteadyBlocks {
        blocks: Vec<Steady>,
        position: Option<&'static str>,
    },
    OverUnder {
        sets: u32,
        reps_per_set: u32,
        under: Steady,
        over: Steady,
        cadence: Option<(u32, u32)>,
    },
    VoToThreshold {
        sets: u32,
        vo2: Steady,
        threshold: Steady,
        position: Option<&'static str>,
    },
    RaceSimulation(RacePattern),
    NormalizedPower {
        minutes: u32,
        intensity_factor: f64,
    },
    Endurance {
        minutes: u32,
        power: f64,
    },
    FtpTest,
    Rest,
}

impl MainSet {
    fn render_into(&self, lines: &mut Vec<String>) {
        match self {
            MainSet::Intervals(repeat) => lines.push(repeat.render()),
            MainSet::Progressive { blocks, .. } => {
                lines.extend(blocks.iter().map(Steady::render));
                if blocks.len() > 2 {
                    lines.push(Steady::new(300, 0.55).render());
                }
            }
            MainSet::SteadyBlocks { blocks, .. } => {
                for block in blocks {
                    lines.push(block.render());
                    if blocks.len() > 1 {
                        lines.push(SET_RECOVERY.render());
                    }
                }
            }
            MainSet::OverUnder {
                sets,
                reps_per_set,
                under,
                over,
                ..
            } => {
                for set in 0..*sets {
                    for _ in 0..*reps_per_set {
                        lines.push(under.render());
                        lines.push(over.render());
                    }
                    if set + 1 < *sets {
                        lines.push(SET_RECOVERY.render());
                    }
                }
            }
            MainSet::VoToThreshold {
                sets,
                vo2,
                threshold,
                ..
            } => {
                for set in 0..*sets {
                    lines.push(vo2.render());
                    lines.push(threshold.render());
                    if set + 1 < *sets {
                        lines.push(SET_RECOVERY.render());
                    }
                }
            }
            MainSet::RaceSimulation(pattern) => {
                lines.extend(pattern.lines().into_iter().map(str::to_string))
            }
            // IF 0.85 over a variable ride; a steady 0.90 lands on the same TSS
            MainSet::NormalizedPower { minutes, .. } => lines.push(format!(
                r#"    <SteadyState Duration="{}" Power="0.90"/>"#,
                minutes * 60
            )),
            MainSet::Endurance { minutes, power } => {
                lines.push(Steady::new(minutes * 60, *power).render())
            }
            MainSet::FtpTest => lines.extend(
                [
                    r#"    <SteadyState Duration="600" Power="0.70"/>"#,
                    r#"    <SteadyState Duration="300" Power="0.85"/>"#,
                    r#"    <SteadyState Duration="60" Power="1.20"/>"#,
                    r#"    <SteadyState Duration="300" Power="0.70"/>"#,
                    r#"    <SteadyState Duration="1200" Power="1.00"/>"#,
                ]
                .map(str::to_string),
            ),
            MainSet::Rest => lines.push(r#"    <SteadyState Duration="600" Power="0.50"/>"#.to_string()),
        }
    }

    /// Position cue attached to this level, if any
    pub fn position(&self) -> Option<&'static str> {
        match self {
            MainSet::Intervals(repeat) => repeat.position,
            MainSet::Progressive { position, .. }
            | MainSet::SteadyBlocks { position, .. }
            | MainSet::VoToThreshold { position, .. } => *position,
            _ => None,
        }
    }

    /// Cadence range attached to this level, if any
    pub fn cadence(&self) -> Option<(u32, u32)> {
        match self {
            MainSet::Intervals(repeat) => repeat.cadence,
            MainSet::OverUnder { cadence, .. } => *cadence,
            _ => None,
        }
    }
}

/// Shortest round-trip form, `0` for an absent off-power
pub fn format_power(power: f64) -> String {
    if power == 0.0 {
        "0".to_string()
    } else {
        format!("{:?}", power)
    }
}

/// Capitalise the first letter of every alphabetic run, lowercase the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Block elements for an archetype key and level.
///
/// Unknown archetypes and out-of-range levels yield an empty string.
pub fn generate_blocks(archetype: &str, level: u8) -> String {
    match (archetype.parse::<Archetype>(), Level::new(level)) {
        (Ok(archetype), Ok(level)) => archetype.blocks(level),
        _ => String::new(),
    }
}
