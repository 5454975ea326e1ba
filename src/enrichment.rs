//! Race-specific notes appended to workout descriptions
//!
//! Which notes a workout receives depends on the race's workout
//! modifications, the week number and the workout's [`WorkoutTag`]s.
//! Notes are appended in a fixed order: heat, hydration, daily baseline
//! hydration, aggressive fueling, position alternation, dress rehearsal,
//! robust taper, gravel grit.

use serde::Serialize;
use tracing::debug;

use crate::models::{RaceData, Workout, WorkoutTag};
use crate::plans::Tier;

/// Rides at or above this length get the long-ride hydration advice
const LONG_HYDRATION_MINUTES: u32 = 90;
/// Shortest ride that gets the position alternation note
const POSITION_MINUTES: u32 = 60;
const DEFAULT_CARBS_PER_HOUR: u32 = 60;
const DEFAULT_REHEARSAL_DAY: &str = "Saturday";
const DEFAULT_REHEARSAL_HOURS: u32 = 9;

/// Heat acclimation protocol strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeatTier {
    BetterThanNothing,
    Good,
    Ideal,
}

/// Hydration advice band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HydrationBand {
    Short,
    LongEasy,
    LongHard,
}

impl HydrationBand {
    pub fn for_ride(minutes: u32, quality: bool) -> Self {
        if minutes < LONG_HYDRATION_MINUTES {
            HydrationBand::Short
        } else if !quality {
            HydrationBand::LongEasy
        } else {
            HydrationBand::LongHard
        }
    }
}

/// One paragraph appended to a description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RaceNote {
    Heat(HeatTier),
    Hydration(HydrationBand),
    BaselineHydration,
    AggressiveFueling { carbs_per_hour: u32 },
    PositionAlternation { minutes: u32 },
    DressRehearsal { hours: u32 },
    RobustTaper,
    GravelGrit { dark_mile: String },
}

impl RaceNote {
    fn title(&self) -> &'static str {
        match self {
            RaceNote::Heat(HeatTier::BetterThanNothing) => "HEAT TRAINING (Better Than Nothing)",
            RaceNote::Heat(HeatTier::Good) => "HEAT TRAINING (Good)",
            RaceNote::Heat(HeatTier::Ideal) => "HEAT TRAINING (Ideal - High Impact)",
            RaceNote::Hydration(_) => "HYDRATION",
            RaceNote::BaselineHydration => "DAILY BASELINE HYDRATION",
            RaceNote::AggressiveFueling { .. } => "AGGRESSIVE FUELING",
            RaceNote::PositionAlternation { .. } => "POSITION ALTERNATION",
            RaceNote::DressRehearsal { .. } => "DRESS REHEARSAL",
            RaceNote::RobustTaper => "ROBUST TAPER",
            RaceNote::GravelGrit { .. } => "GRAVEL GRIT",
        }
    }

    fn body(&self, race_name: &str) -> String {
        match self {
            RaceNote::Heat(HeatTier::BetterThanNothing) => "Protocol: Finish any normal ride, then shower hot (as hot as tolerated) for 10-12 minutes. Keep HR elevated minimally. Hydrate lightly after (don't chug immediately; small sips).\n\nEffect: Maintains heat adaptations, mild plasma-volume expansion, minimal additional stress.\n\nUse When: Fatigued, limited time, or already did the hard workout of the week.".to_string(),
            RaceNote::Heat(HeatTier::Good) => "Protocol: Option 1: 20-40 min Z2 ride inside with reduced airflow. Option 2: 10-15 min sauna/hot bath immediately after training. Keep core temp elevated but manageable. Drink ~500-750 ml + 500-1000 mg sodium during exposure. Finish with only light cooling (no cold shower).\n\nEffect: Start of measurable heat adaptation, raises plasma volume. Training stress increases slightly but manageable.\n\nUse When: Medium weeks, early build phase, you want adaptation without deep fatigue.".to_string(),
            RaceNote::Heat(HeatTier::Ideal) => format!(
                "Protocol: 1) Ride Outside or Indoors With Minimal Cooling: 45-75 min Z2 OR Intervals with fan on low. 2) Post-ride heat exposure: 15-25 min sauna or hot bath. 3) Hydration Target: 1-1.5 L/hr loss is OK. Replace 75% of losses within 2 hours. Sodium 1000-1500 mg/hr. 4) Avoid cooling for 20-30 min after.\n\nEffect: Maximal heat adaptation, big plasma volume gains, noticeable RPE reductions in hot races.\n\nUse When: Preparing for hot events ({}), you're healthy and recovered, you can afford temporary fatigue.",
                race_name
            ),
            RaceNote::Hydration(HydrationBand::Short) => "<90 min (any intensity): 1 bottle/hr with electrolytes mandatory. Before hard efforts, take 1 gel. Light urine color (not clear) = well hydrated.".to_string(),
            RaceNote::Hydration(HydrationBand::LongEasy) => ">90 min low intensity: 60g carbs/hr. 1-1.5 bottles/hr. 600-1200 mg sodium/hr depending on heat. Monitor sweat rate—if losing >1-1.5% bodyweight, increase sodium.".to_string(),
            RaceNote::Hydration(HydrationBand::LongHard) => ">90 min high intensity/intervals/heat: 90g carbs/hr. 1.5 bottles/hr minimum. 1000-1500 mg sodium/hr. Aggressive cooling: ice sock, dump water, shade stops when practical. Replace ~75% of losses within 2 hours post-ride.".to_string(),
            RaceNote::BaselineHydration => "Start day hydrated: ~500 ml water + 500-1000 mg sodium with breakfast. Pre-ride (60 min before): 500 ml fluid + 300-600 mg sodium. Aim for light urine color (not clear).".to_string(),
            RaceNote::AggressiveFueling { carbs_per_hour } => format!(
                "Target {}-90g carbs/hour (up to 100g on dress rehearsal). Train your gut aggressively. This is critical for {}'s long day. Competitors need aggressive fueling—race day isn't the time to discover your stomach can't handle 80g carbs/hour. Practice your race-day nutrition products. Start fueling from mile 1.",
                carbs_per_hour, race_name
            ),
            RaceNote::PositionAlternation { minutes } => {
                let changes = (minutes / 60).max(1);
                let noun = if changes == 1 { "position change" } else { "position changes" };
                format!(
                    "While racing you get as aero as possible (drops), but in training people often try to produce maximum power (hoods, out of saddle). These aren't the same thing. Alternate position every 30 minutes: 30 min in the drops (aero, race position) → 30 min in the hoods (power production, comfort). This builds both aero efficiency and power production. For {}-minute rides, aim for {} {}.",
                    minutes, changes, noun
                )
            }
            RaceNote::DressRehearsal { hours } => format!(
                "THIS IS YOUR {h}-HOUR 'BLOW OUT DAY.' CLEAR YOUR SCHEDULE. This is logistics practice, fueling practice, heat practice, and mental preparation all in one. Test EVERYTHING: nutrition products, hydration system, clothing, bike setup, tire pressure. Practice eating while riding. Practice bottle handoffs. Practice pacing. For Competitors, this {h}-hour ride is worth 15 shorter rides for race prep. This is the difference between finishing and performing at your best.",
                h = hours
            ),
            RaceNote::RobustTaper => "Freshness/form counts for A LOT in this race. You don't want to show up half-cooked when you're going to go so deep in the well. Volume is low, but maintain sharpness. For competitive athletes, freshness is everything for a 200-mile day.".to_string(),
            RaceNote::GravelGrit { dark_mile } => format!(
                "Mental preparation is as important as physical. When mile {} hits and everything hurts, mental toughness gets you through. Visualize success. Break the race into manageable chunks. You've trained for this. You're ready.",
                dark_mile
            ),
        }
    }

    /// Render as a bullet paragraph, prefixed with the race name except for
    /// position alternation, which is race-agnostic
    pub fn render(&self, race_name: &str) -> String {
        match self {
            RaceNote::PositionAlternation { .. } => {
                format!("\n\n• {}:\n{}", self.title(), self.body(race_name))
            }
            _ => format!(
                "\n\n• {} - {}:\n{}",
                race_name.to_uppercase(),
                self.title(),
                self.body(race_name)
            ),
        }
    }
}

/// Decides and renders the race notes for one race and plan tier
#[derive(Debug, Clone, Copy)]
pub struct Enricher<'a> {
    race: &'a RaceData,
    tier: Tier,
}

impl<'a> Enricher<'a> {
    pub fn new(race: &'a RaceData, tier: Tier) -> Self {
        Self { race, tier }
    }

    fn heat_tier(&self, week: u32) -> Option<HeatTier> {
        let heat = &self.race.workout_modifications.heat_training;
        if !heat.enabled {
            return None;
        }
        if heat.tier_1_weeks.contains(&week) {
            Some(HeatTier::BetterThanNothing)
        } else if heat.tier_2_weeks.contains(&week) {
            Some(HeatTier::Good)
        } else if heat.tier_3_weeks.contains(&week) {
            Some(HeatTier::Ideal)
        } else {
            None
        }
    }

    /// Notes for a workout in `week` lasting `minutes`
    pub fn notes(&self, workout: &Workout, week: u32, minutes: u32) -> Vec<RaceNote> {
        let mods = &self.race.workout_modifications;
        let quality = workout.has_tag(WorkoutTag::Quality);
        let long_ride = workout.has_tag(WorkoutTag::LongRide);
        let rest = workout.has_tag(WorkoutTag::Rest);
        let mut notes = Vec::new();

        if quality && !rest {
            if let Some(tier) = self.heat_tier(week) {
                notes.push(RaceNote::Heat(tier));
            }
        }

        if minutes > 0 {
            notes.push(RaceNote::Hydration(HydrationBand::for_ride(minutes, quality)));
            notes.push(RaceNote::BaselineHydration);
        }

        if long_ride {
            notes.push(RaceNote::AggressiveFueling {
                carbs_per_hour: mods
                    .aggressive_fueling
                    .target_carbs_per_hour
                    .unwrap_or(DEFAULT_CARBS_PER_HOUR),
            });
        }

        if (workout.has_tag(WorkoutTag::Endurance) || long_ride) && !rest && minutes >= POSITION_MINUTES
        {
            notes.push(RaceNote::PositionAlternation { minutes });
        }

        let rehearsal = &mods.dress_rehearsal;
        let rehearsal_day = rehearsal.day.as_deref().unwrap_or(DEFAULT_REHEARSAL_DAY);
        if rehearsal.enabled && rehearsal.week == Some(week) && workout.name.contains(rehearsal_day) {
            let hours = rehearsal
                .duration_hours
                .get(self.tier.key())
                .copied()
                .unwrap_or(DEFAULT_REHEARSAL_HOURS);
            notes.push(RaceNote::DressRehearsal { hours });
        }

        if mods.robust_taper.enabled && mods.robust_taper.weeks.contains(&week) {
            notes.push(RaceNote::RobustTaper);
        }

        if mods.gravel_grit.enabled
            && mods.gravel_grit.week == Some(week)
            && workout.has_tag(WorkoutTag::Race)
        {
            notes.push(RaceNote::GravelGrit {
                dark_mile: self.race.dark_mile(),
            });
        }

        notes
    }

    /// The workout description with its race notes appended
    pub fn enrich(&self, workout: &Workout, week: u32, minutes: u32) -> String {
        let notes = self.notes(workout, week, minutes);
        debug!(
            workout = %workout.name,
            week,
            minutes,
            notes = notes.len(),
            "enriching description"
        );
        let race_name = self.race.name();
        let mut description = workout.description.clone();
        for note in &notes {
            description.push_str(&note.render(race_name));
        }
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn race() -> RaceData {
        serde_json::from_value(json!({
            "race_metadata": {"name": "Unbound 200"},
            "race_hooks": {"dark_mile": 140},
            "workout_modifications": {
                "heat_training": {"enabled": true, "tier_1_weeks": [2], "tier_2_weeks": [4], "tier_3_weeks": [6]},
                "aggressive_fueling": {"target_carbs_per_hour": 80},
                "dress_rehearsal": {"enabled": true, "week": 9, "duration_hours": {"finisher": 7}},
                "robust_taper": {"enabled": true, "weeks": [11, 12]},
                "gravel_grit": {"enabled": true, "week": 12}
            }
        }))
        .unwrap()
    }

    fn workout(name: &str) -> Workout {
        let mut w = Workout {
            name: name.to_string(),
            description: "Base.".to_string(),
            ..Default::default()
        };
        w.tags = w.keyword_tags();
        w
    }

    #[test]
    fn test_heat_tier_by_week() {
        let race = race();
        let e = Enricher::new(&race, Tier::Compete);
        let w = workout("W04 Tue - Threshold Intervals");
        assert!(e.notes(&w, 4, 60).contains(&RaceNote::Heat(HeatTier::Good)));
        assert!(e.notes(&w, 6, 60).contains(&RaceNote::Heat(HeatTier::Ideal)));
        assert!(!e.notes(&w, 5, 60).iter().any(|n| matches!(n, RaceNote::Heat(_))));

        let easy = workout("W04 Wed - Easy Spin");
        assert!(!e.notes(&easy, 4, 60).iter().any(|n| matches!(n, RaceNote::Heat(_))));
    }

    #[test]
    fn test_hydration_bands() {
        assert_eq!(HydrationBand::for_ride(89, true), HydrationBand::Short);
        assert_eq!(HydrationBand::for_ride(90, false), HydrationBand::LongEasy);
        assert_eq!(HydrationBand::for_ride(120, true), HydrationBand::LongHard);
    }

    #[test]
    fn test_no_duration_no_hydration() {
        let race = race();
        let e = Enricher::new(&race, Tier::Compete);
        let notes = e.notes(&workout("W03 Mon - Rest Day"), 3, 0);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_long_ride_notes() {
        let race = race();
        let e = Enricher::new(&race, Tier::Finisher);
        let w = workout("W09 Saturday - Long Endurance Ride");
        let notes = e.notes(&w, 9, 300);
        assert!(notes.contains(&RaceNote::AggressiveFueling { carbs_per_hour: 80 }));
        assert!(notes.contains(&RaceNote::PositionAlternation { minutes: 300 }));
        assert!(notes.contains(&RaceNote::DressRehearsal { hours: 7 }));

        let text = e.enrich(&w, 9, 300);
        assert!(text.starts_with("Base.\n\n• UNBOUND 200 - HYDRATION:\n>90 min low intensity"));
        assert!(text.contains("\n\n• POSITION ALTERNATION:\n"));
        assert!(text.contains("aim for 5 position changes."));
        assert!(text.contains("critical for Unbound 200's long day"));
        assert!(text.contains("THIS IS YOUR 7-HOUR 'BLOW OUT DAY.'"));
    }

    #[test]
    fn test_dress_rehearsal_default_hours() {
        let race = race();
        let e = Enricher::new(&race, Tier::Podium);
        let notes = e.notes(&workout("W09 Saturday - Long Ride"), 9, 400);
        assert!(notes.contains(&RaceNote::DressRehearsal { hours: 9 }));
        let sunday = e.notes(&workout("W09 Sunday - Long Ride"), 9, 400);
        assert!(!sunday.iter().any(|n| matches!(n, RaceNote::DressRehearsal { .. })));
    }

    #[test]
    fn test_single_position_change() {
        let note = RaceNote::PositionAlternation { minutes: 75 };
        assert!(note.render("X").ends_with("aim for 1 position change."));
    }

    #[test]
    fn test_race_week_notes() {
        let race = race();
        let e = Enricher::new(&race, Tier::Compete);
        let text = e.enrich(&workout("W12 Sat - RACE DAY"), 12, 0);
        assert!(text.contains("• UNBOUND 200 - ROBUST TAPER:"));
        assert!(text.contains("When mile 140 hits"));
        assert!(text.find("ROBUST TAPER").unwrap() < text.find("GRAVEL GRIT").unwrap());
    }

    #[test]
    fn test_disabled_modifications() {
        let race: RaceData =
            serde_json::from_value(json!({"race_metadata": {"name": "Mid South"}})).unwrap();
        let e = Enricher::new(&race, Tier::Compete);
        let notes = e.notes(&workout("W12 Sat - RACE DAY"), 12, 45);
        assert_eq!(
            notes,
            vec![
                RaceNote::Hydration(HydrationBand::Short),
                RaceNote::BaselineHydration
            ]
        );
    }
}
