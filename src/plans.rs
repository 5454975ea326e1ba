//! The fifteen marketed plan variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, GravelKitError};

/// Weekly-hours category a plan is sold under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Ayahuasca,
    Finisher,
    Compete,
    Podium,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Ayahuasca, Tier::Finisher, Tier::Compete, Tier::Podium];

    pub fn key(&self) -> &'static str {
        match self {
            Tier::Ayahuasca => "ayahuasca",
            Tier::Finisher => "finisher",
            Tier::Compete => "compete",
            Tier::Podium => "podium",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Ayahuasca => "Ayahuasca",
            Tier::Finisher => "Finisher",
            Tier::Compete => "Compete",
            Tier::Podium => "Podium",
        }
    }

    /// Weekly training hours, as shown on headers and cards
    pub fn weekly_hours(&self) -> &'static str {
        match self {
            Tier::Ayahuasca => "0-5",
            Tier::Finisher => "8-12",
            Tier::Compete => "12-18",
            Tier::Podium => "18+",
        }
    }

    /// Phrases that identify this tier in generated copy
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Tier::Ayahuasca => &["ayahuasca", "0-5 hours", "4 hours"],
            Tier::Finisher => &["finisher", "8-12 hours"],
            Tier::Compete => &["compete", "12-18 hours"],
            Tier::Podium => &["podium", "18+ hours", "18 hours"],
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Tier {
    type Err = GravelKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .iter()
            .copied()
            .find(|t| t.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DataError::UnknownVariant {
                    tier: s.to_string(),
                    level: String::new(),
                }
                .into()
            })
    }
}

/// Athlete level within a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanLevel {
    Beginner,
    Intermediate,
    Advanced,
    Masters,
    SaveMyRace,
    AdvancedGoat,
}

impl PlanLevel {
    pub const ALL: [PlanLevel; 6] = [
        PlanLevel::Beginner,
        PlanLevel::Intermediate,
        PlanLevel::Advanced,
        PlanLevel::Masters,
        PlanLevel::SaveMyRace,
        PlanLevel::AdvancedGoat,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PlanLevel::Beginner => "beginner",
            PlanLevel::Intermediate => "intermediate",
            PlanLevel::Advanced => "advanced",
            PlanLevel::Masters => "masters",
            PlanLevel::SaveMyRace => "save_my_race",
            PlanLevel::AdvancedGoat => "advanced_goat",
        }
    }

    /// Name used in headers, e.g. "Masters (50+)"
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanLevel::Beginner => "Beginner",
            PlanLevel::Intermediate => "Intermediate",
            PlanLevel::Advanced => "Advanced",
            PlanLevel::Masters => "Masters (50+)",
            PlanLevel::SaveMyRace => "Save My Race (6 weeks)",
            PlanLevel::AdvancedGoat => "Advanced GOAT",
        }
    }

    /// Name used in variant folder names
    pub fn short_name(&self) -> &'static str {
        match self {
            PlanLevel::SaveMyRace => "Save My Race",
            PlanLevel::Masters => "Masters",
            other => other.display_name(),
        }
    }
}

impl fmt::Display for PlanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PlanLevel {
    type Err = GravelKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        PlanLevel::ALL
            .iter()
            .copied()
            .find(|l| l.key() == normalized)
            .ok_or_else(|| {
                DataError::UnknownVariant {
                    tier: String::new(),
                    level: s.to_string(),
                }
                .into()
            })
    }
}

/// One sellable plan: tier, level and length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanVariant {
    pub number: u8,
    pub tier: Tier,
    pub level: PlanLevel,
    pub weeks: u32,
}

const fn variant(number: u8, tier: Tier, level: PlanLevel, weeks: u32) -> PlanVariant {
    PlanVariant {
        number,
        tier,
        level,
        weeks,
    }
}

/// Every plan sold per race, in catalogue order
pub const PLAN_VARIANTS: [PlanVariant; 15] = [
    variant(1, Tier::Ayahuasca, PlanLevel::Beginner, 12),
    variant(2, Tier::Ayahuasca, PlanLevel::Intermediate, 12),
    variant(3, Tier::Ayahuasca, PlanLevel::Masters, 12),
    variant(4, Tier::Ayahuasca, PlanLevel::SaveMyRace, 6),
    variant(5, Tier::Finisher, PlanLevel::Beginner, 12),
    variant(6, Tier::Finisher, PlanLevel::Intermediate, 12),
    variant(7, Tier::Finisher, PlanLevel::Advanced, 12),
    variant(8, Tier::Finisher, PlanLevel::Masters, 12),
    variant(9, Tier::Finisher, PlanLevel::SaveMyRace, 6),
    variant(10, Tier::Compete, PlanLevel::Intermediate, 12),
    variant(11, Tier::Compete, PlanLevel::Advanced, 12),
    variant(12, Tier::Compete, PlanLevel::Masters, 12),
    variant(13, Tier::Compete, PlanLevel::SaveMyRace, 6),
    variant(14, Tier::Podium, PlanLevel::Advanced, 12),
    variant(15, Tier::Podium, PlanLevel::AdvancedGoat, 12),
];

impl PlanVariant {
    /// Look up the catalogue entry for a tier and level
    pub fn find(tier: Tier, level: PlanLevel) -> Result<PlanVariant, GravelKitError> {
        PLAN_VARIANTS
            .iter()
            .copied()
            .find(|v| v.tier == tier && v.level == level)
            .ok_or_else(|| {
                DataError::UnknownVariant {
                    tier: tier.key().to_string(),
                    level: level.key().to_string(),
                }
                .into()
            })
    }

    /// Folder name, e.g. "5. Finisher Beginner (12 weeks)"
    pub fn folder_name(&self) -> String {
        format!(
            "{}. {} {} ({} weeks)",
            self.number,
            self.tier.display_name(),
            self.level.short_name(),
            self.weeks
        )
    }

    /// Variant for a folder name. Exact catalogue names match first; otherwise
    /// the tier and the most specific level named in the folder are used.
    pub fn from_folder_name(name: &str) -> Option<PlanVariant> {
        if let Some(v) = PLAN_VARIANTS.iter().find(|v| v.folder_name() == name) {
            return Some(*v);
        }
        let lower = name.to_lowercase().replace(['_', '-'], " ");
        PLAN_VARIANTS
            .iter()
            .copied()
            .filter(|v| {
                lower.contains(v.tier.key()) && lower.contains(&v.level.short_name().to_lowercase())
            })
            .max_by_key(|v| v.level.short_name().len())
    }

    /// Slug for per-variant files, e.g. "finisher_beginner"
    pub fn slug(&self) -> String {
        format!("{}_{}", self.tier.key(), self.level.key())
    }

    /// Workouts advertised on the listing
    pub fn workout_count(&self) -> u32 {
        match (self.tier, self.level) {
            _ if self.weeks == 6 => 42,
            (Tier::Compete, PlanLevel::Advanced) => 168,
            (Tier::Podium, PlanLevel::AdvancedGoat) => 112,
            _ => 84,
        }
    }

    pub fn is_masters(&self) -> bool {
        self.level == PlanLevel::Masters
    }
}

impl fmt::Display for PlanVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.folder_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_names() {
        let names: Vec<String> = PLAN_VARIANTS.iter().map(|v| v.folder_name()).collect();
        assert_eq!(names[0], "1. Ayahuasca Beginner (12 weeks)");
        assert_eq!(names[3], "4. Ayahuasca Save My Race (6 weeks)");
        assert_eq!(names[7], "8. Finisher Masters (12 weeks)");
        assert_eq!(names[14], "15. Podium Advanced GOAT (12 weeks)");
    }

    #[test]
    fn test_workout_counts() {
        let count = |tier, level| PlanVariant::find(tier, level).unwrap().workout_count();
        assert_eq!(count(Tier::Finisher, PlanLevel::SaveMyRace), 42);
        assert_eq!(count(Tier::Compete, PlanLevel::Advanced), 168);
        assert_eq!(count(Tier::Podium, PlanLevel::AdvancedGoat), 112);
        assert_eq!(count(Tier::Ayahuasca, PlanLevel::Beginner), 84);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("Compete".parse::<Tier>().unwrap(), Tier::Compete);
        assert_eq!("save my race".parse::<PlanLevel>().unwrap(), PlanLevel::SaveMyRace);
        assert_eq!("advanced_goat".parse::<PlanLevel>().unwrap(), PlanLevel::AdvancedGoat);
        assert!("elite".parse::<Tier>().is_err());
    }

    #[test]
    fn test_from_folder_name() {
        for v in PLAN_VARIANTS {
            assert_eq!(PlanVariant::from_folder_name(&v.folder_name()), Some(v));
        }
        let goat = PlanVariant::from_folder_name("podium_advanced_goat_export").unwrap();
        assert_eq!(goat.level, PlanLevel::AdvancedGoat);
        assert!(PlanVariant::from_folder_name("misc").is_none());
    }

    #[test]
    fn test_unknown_combination() {
        assert!(PlanVariant::find(Tier::Podium, PlanLevel::Beginner).is_err());
    }

    #[test]
    fn test_variants_are_unique() {
        for (i, a) in PLAN_VARIANTS.iter().enumerate() {
            assert_eq!(a.number as usize, i + 1);
            for b in &PLAN_VARIANTS[i + 1..] {
                assert!(!(a.tier == b.tier && a.level == b.level));
            }
        }
    }
}
