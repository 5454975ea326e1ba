//! Hand-written copy variations
//!
//! Placeholders use `{name}` and are filled by [`super::fill`].

use crate::plans::{PlanLevel, Tier};

pub const CHECKMARK: &str = "✓";

pub const FIFTEEN_PLANS_HEADLINES: &[&str] = &[
    "15 PLANS. ONE RACE. ZERO GENERIC BULLSHIT.",
    "15 PLANS. YOUR RACE. NO COOKIE-CUTTER GARBAGE.",
    "15 WAYS TO TRAIN. ONE FINISH LINE. ZERO EXCUSES.",
    "ONE RACE. 15 APPROACHES. FINALLY, A PLAN THAT FITS.",
    "15 PLANS BECAUSE ONE-SIZE-FITS-ALL IS LAZY.",
    "YOUR LIFE. YOUR HOURS. YOUR PLAN. 15 OPTIONS.",
    "NOT ONE PLAN. FIFTEEN. BECAUSE YOU'RE NOT GENERIC.",
    "15 PLANS. BECAUSE 'JUST TRAIN MORE' ISN'T ADVICE.",
    "FIFTEEN PLANS. ONE OBSESSION. ZERO FLUFF.",
    "15 PLANS FOR 15 DIFFERENT LIVES. PICK YOURS.",
];

pub const FIFTEEN_PLANS_BODIES: &[&str] = &[
    "Most plans give you one approach for everyone. That's lazy. A 50-year-old with 6 hrs/week needs <strong>fundamentally different training</strong> than a 28-year-old with 15.",
    "Generic plans assume you're generic. You're not. A parent with 5 hours needs different structure than a single 25-year-old with 20.",
    "One plan for everyone is coach malpractice. Your 8 hours/week demands completely different periodization than someone's 18.",
    "Cookie-cutter plans are for cookie-cutter athletes. You didn't sign up for a generic race—why train with a generic plan?",
    "The 'one plan fits all' approach is how coaches avoid actual coaching. We built 15 because your constraints deserve respect.",
    "Most training plans are lazy. One size, take it or leave it. We built 15 because a Masters athlete and a 25-year-old shouldn't train identically.",
    "You're not a template. A time-crunched parent needs different training than a full-time athlete. That's why there are 15 options, not 1.",
    "Generic plans are easy to sell and hard to execute. We did the work—15 plans matched to 15 real-life situations.",
    "Your schedule isn't average, so why train with an average plan? 15 options because real life comes in more than one flavor.",
    "One-size-fits-all is a lie coaches tell to avoid work. We built 15 plans because your 6 hours isn't the same as someone else's 18.",
];

pub const PHILOSOPHY_TAGLINES: &[&str] = &[
    "<span style=\"color:#40E0D0;font-weight:bold;\">5-8 hrs?</span> Polarized · <span style=\"color:#40E0D0;font-weight:bold;\">8-12?</span> Pyramidal · <span style=\"color:#40E0D0;font-weight:bold;\">12-18?</span> Block · <span style=\"color:#40E0D0;font-weight:bold;\">18+?</span> GOAT",
    "<span style=\"color:#40E0D0;font-weight:bold;\">Limited time?</span> Polarized intensity · <span style=\"color:#40E0D0;font-weight:bold;\">Moderate?</span> Pyramidal balance · <span style=\"color:#40E0D0;font-weight:bold;\">Serious?</span> Block periodization · <span style=\"color:#40E0D0;font-weight:bold;\">All-in?</span> GOAT protocol",
    "<span style=\"color:#40E0D0;font-weight:bold;\">5-8 hrs:</span> Max stimulus, min time · <span style=\"color:#40E0D0;font-weight:bold;\">8-12:</span> Build the base · <span style=\"color:#40E0D0;font-weight:bold;\">12-18:</span> Race to compete · <span style=\"color:#40E0D0;font-weight:bold;\">18+:</span> Leave nothing",
    "Polarized for the time-crunched. Pyramidal for the balanced. Block for the serious. GOAT for the obsessed.",
    "Different hours = different science. We matched the methodology to your reality.",
];

pub const MASTERCLASS_HEADLINES: &[&str] = &[
    "THE 35-PAGE MASTERCLASS",
    "THE 35-PAGE DEEP DIVE",
    "35 PAGES OF WHAT ACTUALLY WORKS",
    "THE GUIDE: 35 PAGES, ZERO FILLER",
    "35 PAGES OF RACE-SPECIFIC INTEL",
    "THE MASTERCLASS: EVERYTHING THAT MATTERS",
    "35 PAGES. META-ANALYZED. RACE-SPECIFIC.",
    "YOUR 35-PAGE UNFAIR ADVANTAGE",
];

pub const MASTERCLASS_INTROS: &[&str] = &[
    "Meta-analysis on everything that matters:",
    "The research, distilled. The BS, removed:",
    "What the science says. What the pros do. What you need:",
    "Everything you need to know, nothing you don't:",
    "Research-backed. Field-tested. Race-specific:",
    "The honest breakdown on what actually moves the needle:",
    "Cut through the noise. Here's what works:",
    "No fluff. No filler. Just what matters:",
];

/// Guide chapters that get a one-line teaser on the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    HeatTraining,
    Fueling,
    RaceTactics,
    MentalTraining,
    WorkoutExecution,
    Recovery,
    Altitude,
}

impl Topic {
    pub fn variations(&self) -> &'static [&'static str] {
        match self {
            Topic::HeatTraining => &[
                "The protocol that works—when to start, how to adapt",
                "When to start, how hard to push, what actually works",
                "The adaptation timeline and protocols that matter",
                "Start date, session structure, adaptation markers",
                "What the research says, what the pros do, what you need",
            ],
            Topic::Fueling => &[
                "Calories, hydration, timing for {distance}+ miles",
                "The math on calories, the science on timing",
                "How much, how often, and what happens when you mess up",
                "{distance} miles of fuel strategy, dialed",
                "Carbs per hour, hydration math, gut training",
            ],
            Topic::RaceTactics => &[
                "When to sit in, when to push, when to survive",
                "Pacing strategy for the long game",
                "The first 50 miles. The middle. The end. Different games.",
                "Group dynamics, solo strategy, checkpoint math",
                "How to not blow up and how to recover when you do",
            ],
            Topic::MentalTraining => &[
                "What to do when mile {dark_mile} hurts",
                "The dark place and how to get through it",
                "Mantras, segments, and suffering management",
                "When your legs quit, your brain takes over. Here's how.",
                "The psychology of ultra-distance suffering",
            ],
            Topic::WorkoutExecution => &[
                "Why most athletes fail intervals",
                "How to actually execute the workouts",
                "The difference between completing and nailing it",
                "RPE, pacing, and why your 'hard' isn't hard enough",
                "Execution details that separate finishers from DNFs",
            ],
            Topic::Recovery => &[
                "The honest takes",
                "What actually matters, what doesn't",
                "Sleep, nutrition, and the stuff most plans skip",
                "The unglamorous work that makes the glamorous work possible",
                "Recovery isn't rest. Here's what it actually is.",
            ],
            Topic::Altitude => &[
                "The 5 strategies—which one matches your schedule",
                "Live high, train low, and 3 other options",
                "What to do if you can't pre-acclimatize",
                "Altitude prep when you live at sea level",
                "The research, the options, and what's realistic",
            ],
        }
    }
}

/// Families of non-negotiable requirements with rephrasing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    HeatAdaptation,
    LongRides,
    Nutrition,
    TireStrategy,
    MentalPrep,
    Climbing,
    Altitude,
    Skills,
    DressRehearsal,
}

impl RequirementKind {
    /// Classify a requirement by its wording; `None` keeps the text as written
    pub fn classify(requirement: &str) -> Option<Self> {
        let raw = requirement.to_lowercase();
        let has = |word: &str| raw.contains(word);

        if has("heat") {
            Some(RequirementKind::HeatAdaptation)
        } else if has("hour") && (has("ride") || has("rehearsal")) {
            Some(RequirementKind::LongRides)
        } else if has("carb") || has("nutrition") || has("fuel") {
            Some(RequirementKind::Nutrition)
        } else if has("tire") {
            Some(RequirementKind::TireStrategy)
        } else if has("mental") || (has("hour") && has("when")) {
            Some(RequirementKind::MentalPrep)
        } else if has("climb") || has("elevation") {
            Some(RequirementKind::Climbing)
        } else if has("altitude") {
            Some(RequirementKind::Altitude)
        } else if has("skill") || has("corner") || has("technical") {
            Some(RequirementKind::Skills)
        } else if has("dress") || has("simulation") {
            Some(RequirementKind::DressRehearsal)
        } else {
            None
        }
    }

    /// Values used when the race record does not supply them
    pub fn defaults(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            RequirementKind::HeatAdaptation => {
                &[("weeks", "4-6"), ("start", "6"), ("end", "10"), ("sessions", "10")]
            }
            RequirementKind::LongRides => &[("hours", "6"), ("week", "9")],
            RequirementKind::Nutrition => &[("carbs", "80-100")],
            RequirementKind::TireStrategy => &[("width", "40"), ("surface", "mixed gravel")],
            RequirementKind::MentalPrep => &[("start", "8"), ("end", "12"), ("dark_mile", "150")],
            RequirementKind::Climbing => &[("elevation", "10,000")],
            RequirementKind::Altitude => &[("altitude", "8000")],
            RequirementKind::Skills => &[("terrain", "technical"), ("surface", "loose gravel")],
            RequirementKind::DressRehearsal => &[("hours", "6"), ("week", "9"), ("percent", "50")],
        }
    }

    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            RequirementKind::HeatAdaptation => &[
                "{checkmark} Heat adaptation protocol starting {weeks} weeks out",
                "{checkmark} Heat training built into weeks {start}-{end}",
                "{checkmark} {sessions}+ heat adaptation sessions before race day",
                "{checkmark} Systematic heat prep—not just 'drink more water'",
                "{checkmark} Heat protocol matched to Kansas June conditions",
            ],
            RequirementKind::LongRides => &[
                "{checkmark} Two {hours}+ hour rides minimum before race day",
                "{checkmark} {hours}-hour dress rehearsal in week {week}",
                "{checkmark} Long ride progression building to {hours} hours",
                "{checkmark} Race simulation rides with full nutrition protocol",
                "{checkmark} Time-in-saddle that actually prepares you",
            ],
            RequirementKind::Nutrition => &[
                "{checkmark} Race-day nutrition dialed: {carbs}g carbs/hour",
                "{checkmark} Fueling strategy tested on training rides",
                "{checkmark} {carbs}g/hour carb protocol, practiced and proven",
                "{checkmark} Gut training built into long ride progression",
                "{checkmark} Nutrition execution—not just 'eat more'",
            ],
            RequirementKind::TireStrategy => &[
                "{checkmark} Tire strategy: {width}mm+ with chunk protection",
                "{checkmark} Tire setup matched to course conditions",
                "{checkmark} Equipment dialed for {surface} surfaces",
                "{checkmark} Tire pressure and width optimized for the course",
                "{checkmark} Rubber that matches the terrain",
            ],
            RequirementKind::MentalPrep => &[
                "{checkmark} Mental prep for hours {start}-{end} when legs stop working",
                "{checkmark} Psychological strategies for mile {dark_mile}",
                "{checkmark} Suffering management for the dark miles",
                "{checkmark} Mental training for when fitness isn't enough",
                "{checkmark} The brain work that gets you to the finish",
            ],
            RequirementKind::Climbing => &[
                "{checkmark} Climbing-specific power development for {elevation}+ feet",
                "{checkmark} Hill repeats building to race-day demands",
                "{checkmark} Sustained climbing intervals throughout build phase",
                "{checkmark} Vertical preparation matched to {elevation} ft gain",
                "{checkmark} Power-to-weight work that transfers to race day",
            ],
            RequirementKind::Altitude => &[
                "{checkmark} Altitude strategy matched to your schedule and access",
                "{checkmark} High-altitude preparation protocol",
                "{checkmark} {altitude}+ ft elevation—specific adaptations built in",
                "{checkmark} Altitude prep options based on your reality",
                "{checkmark} Thin-air protocols for sea-level athletes",
            ],
            RequirementKind::Skills => &[
                "{checkmark} Technical skills training for {terrain} terrain",
                "{checkmark} Cornering and line selection practice built in",
                "{checkmark} Bike handling for race-specific conditions",
                "{checkmark} Skills work that prevents race-day mistakes",
                "{checkmark} Technical confidence for {surface} surfaces",
            ],
            RequirementKind::DressRehearsal => &[
                "{checkmark} {hours}-hour dress rehearsal in week {week}",
                "{checkmark} Full race simulation with race nutrition",
                "{checkmark} Dress rehearsal mimicking race conditions",
                "{checkmark} Practice run covering {percent}% of race distance",
                "{checkmark} Simulation ride with everything dialed",
            ],
        }
    }
}

pub fn tier_descriptions(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Ayahuasca => &[
            "You're underprepared by conventional standards. These plans are damage control—getting you to the finish line when time isn't on your side.",
            "Limited hours, maximum focus. Every session counts when you're working with constraints.",
            "The desperate tier, honestly. But desperate doesn't mean impossible—it means efficient.",
            "You don't have the hours. We get it. This plan squeezes maximum adaptation from minimum time.",
            "Time-crunched reality meets smart training. Not ideal, but effective.",
        ],
        Tier::Finisher => &[
            "This plan maximizes your 8-12 hours with focused quality over junk volume. The goal: cross the line strong, not crawl.",
            "Enough hours to prepare properly. This plan builds the base you need and the fitness to finish confident.",
            "The realistic tier. You've got time to train right—this plan makes sure you do.",
            "8-12 hours is workable. This plan turns those hours into a finish you'll be proud of.",
            "Quality over quantity, but enough quantity to matter. Built for reliable finishes.",
        ],
        Tier::Compete => &[
            "You're not just finishing—you're racing. This plan builds the engine and the tactics to compete for your category.",
            "Serious structure for serious athletes. You've got the time—now build the fitness to use it.",
            "Category placement isn't luck. It's preparation. This is that preparation.",
            "12-18 hours means you can build real race fitness. This plan does exactly that.",
            "The competitor tier. You're not here to survive—you're here to race.",
        ],
        Tier::Podium => &[
            "Elite tier. Full commitment required. If you're reading this, you probably need coaching, not a plan.",
            "Maximum hours, maximum structure, maximum results. This is the all-in option.",
            "The serious-serious tier. Most athletes here benefit from personalized coaching.",
            "18+ hours is a full-time commitment. This plan respects that with full-time structure.",
            "You've got the hours and the drive. This plan has the structure to match.",
        ],
    }
}

/// Advanced GOAT shares the advanced pool
pub fn level_modifiers(level: PlanLevel) -> &'static [&'static str] {
    match level {
        PlanLevel::Beginner => &[
            "Conservative progression. Fundamentals first. Built for athletes new to structured training.",
            "Learning the ropes while building fitness. Sustainable progression over aggressive gains.",
            "First-time structured training? Start here. We'll build the foundation right.",
            "Beginner-friendly progression—but don't confuse beginner with easy.",
        ],
        PlanLevel::Intermediate => &[
            "You know the basics. This plan assumes competence and builds on it.",
            "Some background, looking to level up. Moderate progression with room to push.",
            "Not your first rodeo, but not your hundredth either. Balanced approach.",
            "Experience meets ambition. Solid structure for solid athletes.",
        ],
        PlanLevel::Advanced | PlanLevel::AdvancedGoat => &[
            "Aggressive progression for experienced athletes. You know your body—this plan pushes it.",
            "High intensity, high volume, high expectations. Built for athletes who can handle it.",
            "You've done the work before. This plan assumes that and builds accordingly.",
            "Advanced means advanced. Don't pick this if you're not ready for it.",
        ],
        PlanLevel::Masters => &[
            "Fast After 50 methodology. Recovery emphasis without sacrificing intensity.",
            "Age-appropriate periodization. Your experience is an asset—train like it.",
            "Masters athletes need different structure. This plan delivers it.",
            "Recovery isn't weakness—it's wisdom. Built for athletes who know the difference.",
        ],
        PlanLevel::SaveMyRace => &[
            "Six weeks. Emergency protocol. Compressed intensity because that's what you've got.",
            "The Hail Mary tier. Not ideal, but better than showing up unprepared.",
            "Race is soon, training is behind. This plan does damage control.",
            "Six weeks of focused work beats six weeks of panic. Start here.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_requirements() {
        use RequirementKind::*;
        let cases = [
            ("Heat adaptation protocol (weeks 6-10)", Some(HeatAdaptation)),
            ("Two 6-hour rides before race day", Some(LongRides)),
            ("Practice 80g carbs per hour", Some(Nutrition)),
            ("40mm+ tires with sealant", Some(TireStrategy)),
            ("Mental toughness for the last 50 miles", Some(MentalPrep)),
            ("Climbing durability for 11,000 ft", Some(Climbing)),
            ("Altitude acclimatization plan", Some(Altitude)),
            ("Technical descending practice", Some(Skills)),
            ("Full race simulation", Some(DressRehearsal)),
            ("Show up rested", None),
        ];
        for (text, expected) in cases {
            assert_eq!(RequirementKind::classify(text), expected, "{}", text);
        }
    }

    #[test]
    fn test_every_pool_is_populated() {
        for tier in Tier::ALL {
            assert!(!tier_descriptions(tier).is_empty());
        }
        for level in PlanLevel::ALL {
            assert!(!level_modifiers(level).is_empty());
        }
    }
}
