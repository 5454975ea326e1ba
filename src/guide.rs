//! Self-contained HTML training guide per plan variant

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{OutputError, Result};
use crate::models::{PlanTemplate, RaceData};
use crate::plans::{PlanLevel, PlanVariant, Tier};
use crate::template::{escape_html, to_html_entities, Replacements};

const GUIDE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{{RACE_NAME}} | {{PLAN_TITLE}}</title>
<style>
body{font-family:'Courier New',monospace;background:#F5F5DC;color:#000;margin:0;padding:32px;}
h1,h2{text-transform:uppercase;}
section{border:4px solid #000;box-shadow:8px 8px 0 #59473C;background:#fff;padding:20px;margin:24px 0;}
table{border-collapse:collapse;width:100%;}
th,td{border:2px solid #000;padding:6px 10px;text-align:left;vertical-align:top;}
th{background:#59473C;color:#F5F5DC;}
.gg-tag{color:#40E0D0;font-weight:bold;}
.gg-guide-layout{display:grid;grid-template-columns:220px 1fr;gap:32px;}
.gg-guide-toc{position:sticky;top:32px;align-self:start;border:3px solid #000;background:#fff;padding:12px;}
.gg-guide-toc a{color:#000;}
@media (max-width:800px){.gg-guide-layout{grid-template-columns:1fr;}.gg-guide-toc{position:static;}}
</style>
</head>
<body class="gg-guide-page">
<div class="gg-guide-layout">
<nav class="gg-guide-toc">
<h2>Contents</h2>
<ol>
<li><a href="#section-1-race-overview">The Race</a></li>
<li><a href="#section-2-plan-overview">Your Plan</a></li>
<li><a href="#section-3-schedule">Week by Week</a></li>
<li><a href="#section-4-tire-pressure">Tire Pressure</a></li>
<li><a href="#section-5-fueling">Fueling</a></li>
<li><a href="#section-6-non-negotiables">Non-Negotiables</a></li>
</ol>
</nav>
<main>
<header>
<div class="gg-tag">GRAVEL GOD CYCLING</div>
<h1>{{RACE_NAME}} Training Guide</h1>
<h2>{{TIER}} | {{LEVEL}} | {{WEEKLY_HOURS}} HRS/WEEK</h2>
</header>
<section id="section-1-race-overview">
<h2>The Race</h2>
<p><strong>{{RACE_HOOK}}</strong></p>
<table>
{{RACE_FACTS}}
</table>
</section>
<section id="section-2-plan-overview">
<h2>Your Plan</h2>
<p>{{TIER_DESCRIPTION}}</p>
<p>{{PLAN_WEEKS}} weeks, {{WORKOUT_COUNT}} workouts. Built for: {{TARGET_ATHLETE}}</p>
<p>Goal: {{GOAL}}</p>
</section>
<section id="section-3-schedule">
<h2>Week by Week</h2>
<table>
<tr><th>Week</th><th>Focus</th><th>Workouts</th></tr>
{{SCHEDULE_ROWS}}
</table>
</section>
<section id="section-4-tire-pressure">
<h2>Tire Pressure</h2>
<p>Starting points for 40-45mm tubeless tires, in PSI (front / rear). Drop 2 PSI for wider tires.</p>
<table>
<tr><th>Surface</th>{{WEIGHT_HEADERS}}</tr>
{{TIRE_ROWS}}
</table>
</section>
<section id="section-5-fueling">
<h2>Fueling by Ride Duration</h2>
<table>
<tr><th>Duration</th><th>Carbs/hr</th><th>Fluid</th><th>Sodium</th><th>Notes</th></tr>
{{FUELING_ROWS}}
</table>
</section>
<section id="section-6-non-negotiables">
<h2>Non-Negotiables for {{RACE_NAME}}</h2>
<ul>
{{NON_NEGOTIABLES}}
</ul>
</section>
<footer>
<p>GRAVEL GOD &middot; gravelgodcycling.com &middot; Become what you are.</p>
</footer>
</main>
</div>
</body>
</html>
"##;

/// Surfaces in the tire pressure table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Surface {
    SmoothGravel,
    MixedGravel,
    ChunkyGravel,
    WetOrMud,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::SmoothGravel,
        Surface::MixedGravel,
        Surface::ChunkyGravel,
        Surface::WetOrMud,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Surface::SmoothGravel => "Smooth hardpack",
            Surface::MixedGravel => "Mixed gravel",
            Surface::ChunkyGravel => "Chunky / rocky",
            Surface::WetOrMud => "Wet / mud",
        }
    }

    /// Rear pressure offset from the smooth-gravel baseline
    fn offset(&self) -> i32 {
        match self {
            Surface::SmoothGravel => 0,
            Surface::MixedGravel => -2,
            Surface::ChunkyGravel => -4,
            Surface::WetOrMud => -6,
        }
    }
}

/// Rider weight bands with the smooth-gravel rear baseline
pub const WEIGHT_BANDS: &[(&str, i32)] = &[
    ("&lt;150 lb", 32),
    ("150-180 lb", 35),
    ("180-210 lb", 38),
    ("210+ lb", 41),
];

/// Front runs this much lower than rear
const FRONT_OFFSET: i32 = 2;

/// `(front, rear)` PSI for a surface and weight baseline
pub fn tire_pressure(surface: Surface, baseline: i32) -> (i32, i32) {
    let rear = baseline + surface.offset();
    (rear - FRONT_OFFSET, rear)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelingScenario {
    pub duration: &'static str,
    pub carbs_per_hour: &'static str,
    pub fluid: &'static str,
    pub sodium: &'static str,
    pub notes: &'static str,
}

pub const FUELING_SCENARIOS: &[FuelingScenario] = &[
    FuelingScenario {
        duration: "Under 90 min",
        carbs_per_hour: "0-30g",
        fluid: "1 bottle/hr",
        sodium: "300-500 mg/hr",
        notes: "Electrolytes mandatory. One gel before hard efforts.",
    },
    FuelingScenario {
        duration: "90 min - 3 hr",
        carbs_per_hour: "60g",
        fluid: "1-1.5 bottles/hr",
        sodium: "600-1200 mg/hr",
        notes: "Start eating in the first 30 minutes.",
    },
    FuelingScenario {
        duration: "3-6 hr",
        carbs_per_hour: "60-90g",
        fluid: "1.5 bottles/hr",
        sodium: "1000-1500 mg/hr",
        notes: "Mix liquid and solid carbs. Practice race products.",
    },
    FuelingScenario {
        duration: "6-10 hr",
        carbs_per_hour: "{{TARGET_CARBS}}-90g",
        fluid: "1.5-2 bottles/hr",
        sodium: "1000-1500 mg/hr",
        notes: "Gut-trained intake only. Plan every refill stop.",
    },
    FuelingScenario {
        duration: "10+ hr",
        carbs_per_hour: "{{TARGET_CARBS}}-100g",
        fluid: "2 bottles/hr",
        sodium: "1500 mg/hr",
        notes: "Real food after hour 6. Eat before you are hungry.",
    },
];

const DEFAULT_TARGET_CARBS: u32 = 60;

/// Long-form tier and level description; falls back to the plan's own
/// athlete and goal for combinations that are not sold
pub fn tier_description(tier: Tier, level: PlanLevel, plan: &PlanTemplate) -> String {
    use PlanLevel::*;
    use Tier::*;

    let text = match (tier, level) {
        (Ayahuasca, Beginner) => "You have almost no time but want to finish. This plan accepts that reality and maximizes every minute. Survival mode training that gets you across the line.",
        (Ayahuasca, Intermediate) => "You have 3-5 hours per week and want performance, not just completion. This plan uses G-Spot and Threshold because they deliver maximum fitness gains in minimum time.",
        (Ayahuasca, Masters) => "You're 50+ with minimal time (3-5 hrs/week) but want to finish strong. This plan combines autoregulation with time-efficient intensity. Recovery enables performance at 50+.",
        (Ayahuasca, SaveMyRace) => "Emergency situation with minimal time. You already have base fitness—you just need race-specific sharpening. G-Spot and Threshold deliver maximum race readiness in minimum time.",
        (Finisher, Beginner) => "You have a life outside cycling but want to do this right. This plan maximizes your 8-12 hours with focused quality over junk volume. The goal: cross the line strong, not crawl.",
        (Finisher, Intermediate) => "You have 8-12 hours per week and want a solid finish. This plan uses polarized training (80% easy, 20% hard) to build durability and race-ready fitness.",
        (Finisher, Advanced) => "You have 8-12 hours and want a strong finish. This plan uses the GOAT Method—pyramidal base, polarized weeks, limiter-focused blocks. Serious structure for serious athletes.",
        (Finisher, Masters) => "You're 50+ with 8-12 hours per week. This plan combines autoregulation with polarized training. Recovery matters more than the workout at 50+.",
        (Finisher, SaveMyRace) => "Emergency situation, already has base fitness, needs final sharpening. G-Spot and Threshold deliver maximum race readiness in compressed timeframe.",
        (Compete, Intermediate) => "You're not just finishing—you're racing. This plan builds the engine and the tactics to compete for your category. Polarized training for competitive performance.",
        (Compete, Advanced) => "You're racing for podium. This plan uses Block Periodization—concentrated loading on your biggest limiter, then race sharpening. Advanced training for advanced athletes.",
        (Compete, Masters) => "You're 50+ with performance goals. This plan combines autoregulation with polarized training. Recovery enables performance—you can't force fitness at 50+.",
        (Compete, SaveMyRace) => "Emergency situation, already race-fit, needs final sharpening for competitive performance. Compressed Block Periodization delivers peak performance in 6 weeks.",
        (Podium, Advanced) => "You're racing to win. This plan uses HVLI (High Volume, Low Intensity) or GOAT Method—massive aerobic volume builds extreme durability. Elite-level preparation.",
        (Podium, AdvancedGoat) => "You're racing to win. This plan uses GOAT (Gravel Optimized Adaptive Training)—pyramidal base, polarized weeks, limiter-focused blocks, multi-signal autoregulation. Elite preparation.",
        _ => {
            let meta = &plan.plan_metadata;
            return format!(
                "{} {} plan for {}. {}",
                tier.display_name(),
                level.display_name(),
                meta.target_athlete,
                meta.goal
            );
        }
    };
    text.to_string()
}

fn race_facts(race: &RaceData) -> String {
    let meta = &race.race_metadata;
    let facts = [
        ("Distance", meta.distance_miles.as_ref().map(|d| format!("{} miles", d))),
        ("Elevation", meta.elevation_feet.as_ref().map(|e| format!("{} ft", e))),
        ("Location", meta.location.clone()),
        ("Date", meta.date.clone()),
        ("Weather", meta.weather.clone()),
    ];
    facts
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_ref()
                .map(|v| format!("<tr><th>{}</th><td>{}</td></tr>", label, escape_html(v)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn schedule_rows(plan: &PlanTemplate) -> String {
    plan.weeks
        .iter()
        .map(|week| {
            let workouts = week
                .entries()
                .iter()
                .map(|(block, workout)| match block {
                    Some(block) => format!("{} <em>[{}]</em>", escape_html(&workout.name), escape_html(block)),
                    None => escape_html(&workout.name),
                })
                .collect::<Vec<_>>()
                .join("<br>");
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                week.week_number,
                escape_html(week.focus.as_deref().unwrap_or("")),
                workouts
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tire_rows() -> (String, String) {
    let headers = WEIGHT_BANDS
        .iter()
        .map(|(label, _)| format!("<th>{}</th>", label))
        .collect::<String>();
    let rows = Surface::ALL
        .iter()
        .map(|surface| {
            let cells = WEIGHT_BANDS
                .iter()
                .map(|(_, baseline)| {
                    let (front, rear) = tire_pressure(*surface, *baseline);
                    format!("<td>{} / {}</td>", front, rear)
                })
                .collect::<String>();
            format!("<tr><td>{}</td>{}</tr>", surface.label(), cells)
        })
        .collect::<Vec<_>>()
        .join("\n");
    (headers, rows)
}

fn fueling_rows() -> String {
    FUELING_SCENARIOS
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                s.duration, s.carbs_per_hour, s.fluid, s.sodium, s.notes
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the guide for one variant
pub fn render_guide(race: &RaceData, plan: &PlanTemplate, variant: PlanVariant) -> Result<String> {
    let (weight_headers, tire_rows) = tire_rows();
    let target_carbs = race
        .workout_modifications
        .aggressive_fueling
        .target_carbs_per_hour
        .unwrap_or(DEFAULT_TARGET_CARBS);
    let weekly_hours = plan
        .plan_metadata
        .target_hours
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| variant.tier.weekly_hours().to_string());
    let hook = race
        .race_hooks
        .punchy
        .as_deref()
        .or(race.marketplace_variables.race_hook.as_deref())
        .unwrap_or_default();
    let non_negotiables = race
        .non_negotiables
        .iter()
        .map(|nn| format!("<li>&#10004; {}</li>", to_html_entities(&escape_html(&nn.requirement()))))
        .collect::<Vec<_>>()
        .join("\n");

    // Rows are filled first so their own tokens resolve in the second pass
    let body = Replacements::new()
        .with("FUELING_ROWS", fueling_rows())
        .apply(GUIDE_TEMPLATE);

    Replacements::new()
        .with("RACE_NAME", escape_html(race.name()))
        .with("PLAN_TITLE", escape_html(&variant.folder_name()))
        .with("TIER", variant.tier.display_name())
        .with("LEVEL", variant.level.display_name())
        .with("WEEKLY_HOURS", escape_html(&weekly_hours))
        .with("RACE_HOOK", to_html_entities(&escape_html(hook)))
        .with("RACE_FACTS", race_facts(race))
        .with(
            "TIER_DESCRIPTION",
            to_html_entities(&escape_html(&tier_description(variant.tier, variant.level, plan))),
        )
        .with("PLAN_WEEKS", variant.weeks)
        .with("WORKOUT_COUNT", plan.workout_count())
        .with("TARGET_ATHLETE", escape_html(&plan.plan_metadata.target_athlete))
        .with("GOAL", escape_html(&plan.plan_metadata.goal))
        .with("SCHEDULE_ROWS", schedule_rows(plan))
        .with("WEIGHT_HEADERS", weight_headers)
        .with("TIRE_ROWS", tire_rows)
        .with("TARGET_CARBS", target_carbs)
        .with("NON_NEGOTIABLES", non_negotiables)
        .apply_strict(&body)
}

/// Render and write `<dir>/guides/<slug>_guide.html`
pub fn write_guide(
    race: &RaceData,
    plan: &PlanTemplate,
    variant: PlanVariant,
    dir: &Path,
) -> Result<PathBuf> {
    let html = render_guide(race, plan, variant)?;
    let guides_dir = dir.join("guides");
    fs::create_dir_all(&guides_dir).map_err(|e| OutputError::CreateDir {
        path: guides_dir.clone(),
        reason: e.to_string(),
    })?;
    let path = guides_dir.join(format!("{}_guide.html", variant.slug()));
    fs::write(&path, html).map_err(|e| OutputError::WriteFailed {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), "guide written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::leftover_tokens;
    use serde_json::json;

    fn race() -> RaceData {
        serde_json::from_value(json!({
            "race_metadata": {"name": "Unbound 200", "distance_miles": 200, "elevation_feet": "11,000", "location": "Emporia, KS"},
            "race_hooks": {"punchy": "Flint Hills chunk & heat."},
            "workout_modifications": {"aggressive_fueling": {"target_carbs_per_hour": 80}},
            "non_negotiables": ["Heat protocol → weeks 6-10", {"requirement": "Two 6-hour rides"}]
        }))
        .unwrap()
    }

    fn plan() -> PlanTemplate {
        serde_json::from_value(json!({
            "plan_metadata": {"name": "Compete Advanced", "target_athlete": "racers", "goal": "Podium.", "target_hours": "12-18"},
            "weeks": [
                {"week_number": 1, "focus": "Base", "workouts": [{"name": "W01 Tue - Threshold <Intro>"}]},
                {"week_number": 2, "workouts_by_block": {"A": [{"name": "W02 Tue - VO2max"}], "B": [{"name": "W02 Tue - SFR"}]}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_guide_sections() {
        let variant = PlanVariant::find(Tier::Compete, PlanLevel::Advanced).unwrap();
        let html = render_guide(&race(), &plan(), variant).unwrap();
        assert!(leftover_tokens(&html).is_empty());
        assert!(html.contains("<h2>Compete | Advanced | 12-18 HRS/WEEK</h2>"));
        assert!(html.contains("<strong>Flint Hills chunk &amp; heat.</strong>"));
        assert!(html.contains("<tr><th>Elevation</th><td>11,000 ft</td></tr>"));
        assert!(html.contains("Block Periodization"));
        assert!(html.contains("W01 Tue - Threshold &lt;Intro&gt;"));
        assert!(html.contains("W02 Tue - VO2max <em>[A]</em>"));
        assert!(html.contains("12 weeks, 3 workouts"));
        assert!(html.contains("<td>80-90g</td>"));
        assert!(html.contains("<li>&#10004; Heat protocol &rarr; weeks 6-10</li>"));
        assert!(html.contains("id=\"section-6-non-negotiables\""));
        assert!(html.contains("class=\"gg-guide-toc\""));
    }

    #[test]
    fn test_tire_table() {
        assert_eq!(tire_pressure(Surface::SmoothGravel, 35), (33, 35));
        assert_eq!(tire_pressure(Surface::WetOrMud, 32), (24, 26));
        let (headers, rows) = tire_rows();
        assert_eq!(headers.matches("<th>").count(), WEIGHT_BANDS.len());
        assert_eq!(rows.lines().count(), Surface::ALL.len());
    }

    #[test]
    fn test_tier_description_fallback() {
        let text = tier_description(Tier::Podium, PlanLevel::Beginner, &plan());
        assert_eq!(text, "Podium Beginner plan for racers. Podium.");
    }

    #[test]
    fn test_write_guide() {
        let dir = tempfile::tempdir().unwrap();
        let variant = PlanVariant::find(Tier::Finisher, PlanLevel::Beginner).unwrap();
        let path = write_guide(&race(), &plan(), variant, dir.path()).unwrap();
        assert!(path.ends_with("guides/finisher_beginner_guide.html"));
        assert!(fs::read_to_string(path).unwrap().contains("Unbound 200 Training Guide"));
    }
}
