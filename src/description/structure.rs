//! Block analysis feeding the MAIN SET text

use serde::Serialize;

use crate::zwo::{Block, BlockKind};

/// Blocks below this fraction of FTP are recoveries
const RECOVERY_CEILING: f64 = 0.60;
/// Work blocks considered for over/under pairing
const WORK_FLOOR: f64 = 0.80;
/// Dividing line between the "under" and the "over" of a pair
const OVER_THRESHOLD: f64 = 0.92;
/// Z2 band marking the endurance part of a durability ride
const Z2_BAND: (f64, f64) = (0.65, 0.72);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalSet {
    pub reps: u32,
    pub on_seconds: u32,
    pub on_power: f64,
    pub off_seconds: u32,
}

impl IntervalSet {
    /// "3:30" for partial minutes, else "5min"
    pub fn on_label(&self) -> String {
        let (min, sec) = (self.on_seconds / 60, self.on_seconds % 60);
        if sec > 0 {
            format!("{}:{:02}", min, sec)
        } else {
            format!("{}min", min)
        }
    }

    pub fn on_minutes(&self) -> u32 {
        self.on_seconds / 60
    }

    pub fn off_minutes(&self) -> u32 {
        self.off_seconds / 60
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteadyBlock {
    pub seconds: u32,
    pub power: f64,
}

impl SteadyBlock {
    pub fn minutes(&self) -> u32 {
        self.seconds / 60
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverUnder {
    pub sets: u32,
    pub reps_per_set: u32,
    pub under: SteadyBlock,
    pub over: SteadyBlock,
    pub recovery_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MainSetPart {
    Intervals(IntervalSet),
    OverUnder(OverUnder),
    Steady(SteadyBlock),
}

/// What the blocks of a workout add up to
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkoutStructure {
    pub warmup_minutes: Option<u32>,
    pub cooldown_minutes: Option<u32>,
    pub main_sets: Vec<MainSetPart>,
    /// Free-ride block carrying a power target
    pub free_ride: Option<SteadyBlock>,
    /// Z2 blocks ridden around interval sets
    pub durability_z2: Vec<SteadyBlock>,
    pub total_minutes: u32,
}

impl WorkoutStructure {
    pub fn analyze(blocks: &[Block]) -> Self {
        let mut structure = WorkoutStructure::default();

        if let Some(warmup) = blocks.iter().find(|b| b.kind == BlockKind::Warmup) {
            let minutes = warmup.duration() / 60;
            structure.warmup_minutes = Some(minutes);
            structure.total_minutes = structure.total_minutes.saturating_add(minutes);
        }

        if let Some(cooldown) = blocks.iter().find(|b| b.kind == BlockKind::Cooldown) {
            let minutes = cooldown.duration() / 60;
            structure.cooldown_minutes = Some(minutes);
            structure.total_minutes = structure.total_minutes.saturating_add(minutes);
        }

        let free_ride = blocks
            .iter()
            .filter(|b| b.kind == BlockKind::FreeRide)
            .find_map(|b| {
                b.attr_f64("Power").map(|power| SteadyBlock {
                    seconds: b.duration(),
                    power,
                })
            });
        if let Some(free_ride) = free_ride {
            structure.total_minutes =
                structure.total_minutes.saturating_add(free_ride.minutes());
            structure.free_ride = Some(free_ride);
        }

        for block in blocks.iter().filter(|b| b.kind == BlockKind::IntervalsT) {
            let set = IntervalSet {
                reps: block.attr_u32("Repeat").unwrap_or(1),
                on_seconds: block.attr_u32("OnDuration").unwrap_or(0),
                on_power: block.attr_f64("OnPower").unwrap_or(0.0),
                off_seconds: block.attr_u32("OffDuration").unwrap_or(0),
            };
            structure.total_minutes =
                structure.total_minutes.saturating_add(block.total_seconds() / 60);
            structure.main_sets.push(MainSetPart::Intervals(set));
        }

        let steady: Vec<SteadyBlock> = blocks
            .iter()
            .filter(|b| b.kind == BlockKind::SteadyState)
            .filter_map(|b| {
                b.attr_f64("Power").map(|power| SteadyBlock {
                    seconds: b.duration(),
                    power,
                })
            })
            .collect();

        if !structure.main_sets.is_empty() {
            structure.durability_z2 = steady
                .iter()
                .copied()
                .filter(|b| (Z2_BAND.0..=Z2_BAND.1).contains(&b.power))
                .collect();
        }

        if steady.len() >= 4 {
            if let Some(pattern) = detect_over_under(&steady) {
                structure.main_sets.push(MainSetPart::OverUnder(pattern));
                return structure;
            }
        }

        for block in steady.into_iter().filter(|b| b.power >= RECOVERY_CEILING) {
            structure.total_minutes = structure.total_minutes.saturating_add(block.minutes());
            structure.main_sets.push(MainSetPart::Steady(block));
        }

        structure
    }

    pub fn is_durability(&self) -> bool {
        !self.durability_z2.is_empty()
    }

    pub fn intervals(&self) -> impl Iterator<Item = &IntervalSet> {
        self.main_sets.iter().filter_map(|part| match part {
            MainSetPart::Intervals(set) => Some(set),
            _ => None,
        })
    }

    /// Minutes of riding outside warmup and cooldown
    pub fn main_minutes(&self) -> u32 {
        self.total_minutes
            .saturating_sub(self.warmup_minutes.unwrap_or(0))
            .saturating_sub(self.cooldown_minutes.unwrap_or(0))
    }
}

/// Pair (under, over) work blocks; recoveries split the pairs into sets
fn detect_over_under(steady: &[SteadyBlock]) -> Option<OverUnder> {
    let work: Vec<&SteadyBlock> = steady.iter().filter(|b| b.power >= WORK_FLOOR).collect();
    let recoveries: Vec<&SteadyBlock> = steady
        .iter()
        .filter(|b| b.power < RECOVERY_CEILING)
        .collect();

    if work.len() < 4 {
        return None;
    }

    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < work.len() {
        let (under, over) = (work[i], work[i + 1]);
        if under.power < over.power && under.power < OVER_THRESHOLD && over.power >= OVER_THRESHOLD
        {
            pairs.push((*under, *over));
            i += 2;
        } else {
            i += 1;
        }
    }

    if pairs.len() < 2 {
        return None;
    }

    let sets = recoveries.len() as u32 + 1;
    let reps_per_set = (pairs.len() as u32 / sets).max(1);
    let (under, over) = pairs[0];

    Some(OverUnder {
        sets,
        reps_per_set,
        under,
        over,
        recovery_minutes: recoveries.first().map(|r| r.minutes()).unwrap_or(3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zwo::parse_blocks;

    fn analyze(xml: &str) -> WorkoutStructure {
        WorkoutStructure::analyze(&parse_blocks(xml).unwrap())
    }

    #[test]
    fn test_huge_durations_do_not_overflow() {
        let s = analyze(
            r#"<Warmup Duration="600" PowerLow="0.5" PowerHigh="0.75"/>
               <IntervalsT Repeat="100000" OnDuration="60000" OnPower="1.0" OffDuration="1" OffPower="0.5"/>"#,
        );
        assert_eq!(s.total_minutes, 10 + u32::MAX / 60);
        assert_eq!(s.main_minutes(), u32::MAX / 60);
    }

    #[test]
    fn test_intervals() {
        let s = analyze(
            r#"<Warmup Duration="900" PowerLow="0.5" PowerHigh="0.75"/>
               <IntervalsT Repeat="5" OnDuration="210" OnPower="1.1" OffDuration="180" OffPower="0.55"/>
               <Cooldown Duration="600" PowerLow="0.5" PowerHigh="0.65"/>"#,
        );
        assert_eq!(s.warmup_minutes, Some(15));
        assert_eq!(s.cooldown_minutes, Some(10));
        let set = s.intervals().next().unwrap();
        assert_eq!(set.on_label(), "3:30");
        assert_eq!(set.off_minutes(), 3);
        assert_eq!(s.total_minutes, 15 + 10 + 32);
        assert!(!s.is_durability());
    }

    #[test]
    fn test_over_under_sets() {
        let s = analyze(
            r#"<SteadyState Duration="180" Power="0.88"/>
               <SteadyState Duration="60" Power="0.98"/>
               <SteadyState Duration="180" Power="0.88"/>
               <SteadyState Duration="60" Power="0.98"/>
               <SteadyState Duration="180" Power="0.55"/>
               <SteadyState Duration="180" Power="0.88"/>
               <SteadyState Duration="60" Power="0.98"/>
               <SteadyState Duration="180" Power="0.88"/>
               <SteadyState Duration="60" Power="0.98"/>"#,
        );
        match &s.main_sets[0] {
            MainSetPart::OverUnder(ou) => {
                assert_eq!(ou.sets, 2);
                assert_eq!(ou.reps_per_set, 2);
                assert_eq!(ou.under.minutes(), 3);
                assert_eq!(ou.over.minutes(), 1);
                assert_eq!(ou.recovery_minutes, 3);
            }
            other => panic!("expected over/under, got {:?}", other),
        }
    }

    #[test]
    fn test_steady_blocks_skip_recoveries() {
        let s = analyze(
            r#"<SteadyState Duration="900" Power="0.85"/>
               <SteadyState Duration="180" Power="0.55"/>
               <SteadyState Duration="900" Power="0.85"/>"#,
        );
        assert_eq!(s.main_sets.len(), 2);
        assert_eq!(s.total_minutes, 30);
        assert_eq!(s.main_minutes(), 30);
    }

    #[test]
    fn test_durability() {
        let s = analyze(
            r#"<SteadyState Duration="7200" Power="0.7"/>
               <IntervalsT Repeat="3" OnDuration="600" OnPower="0.95" OffDuration="300" OffPower="0.55"/>
               <SteadyState Duration="1800" Power="0.68"/>"#,
        );
        assert!(s.is_durability());
        assert_eq!(s.durability_z2.len(), 2);
    }

    #[test]
    fn test_free_ride_with_power() {
        let s = analyze(r#"<FreeRide Duration="7200" Power="0.85"/>"#);
        assert_eq!(s.free_ride.map(|f| f.minutes()), Some(120));
        assert!(analyze(r#"<FreeRide Duration="60"/>"#).free_ride.is_none());
    }
}
