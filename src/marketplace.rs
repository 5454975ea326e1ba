//! Marketplace listing HTML
//!
//! One listing per plan variant: race hook, the "15 plans" pitch, masterclass
//! topic teasers, the race's non-negotiables and the tier header, filled into
//! a fixed neo-brutalist template.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MarketplaceSettings;
use crate::copy::{self, CopyPicker, CopyVariations};
use crate::error::Result;
use crate::models::{PlanTemplate, RaceData};
use crate::plans::PlanVariant;
use crate::template::{text_char_count, to_html_entities, Replacements};

/// Topics shown on the listing
const MAX_TOPICS: usize = 6;
/// Non-negotiables shown on the listing
const MAX_NON_NEGOTIABLES: usize = 3;
const RECOVERY_TOPIC: &str = "recovery_tires_strength";

pub const MARKETPLACE_TEMPLATE: &str = r#"<div style="font-family:'Courier New',monospace;background:#F5F5DC;padding:20px;">
<div style="background:#59473C;color:#F5F5DC;padding:12px 20px;display:inline-block;margin-bottom:16px;">
GRAVEL GOD CYCLING
---
</div>
<div style="border-left:4px solid #40E0D0;padding-left:16px;margin-bottom:20px;">
<p style="font-size:18px;color:#000;margin:0;"><strong>{{RACE_HOOK}}</strong></p>
<p style="font-size:14px;color:#59473C;margin-top:8px;">{{RACE_HOOK_DETAIL}}</p>
</div>
<div style="border:4px solid #000;box-shadow:8px 8px 0 #000;padding:20px;margin:20px 0;background:#fff;">
<h2 style="margin-top:0;color:#000;">{{FIFTEEN_PLANS_HEADLINE}}</h2>
<p>{{FIFTEEN_PLANS_BODY}}</p>
<p style="margin-bottom:0;">{{PHILOSOPHY_TAGLINE}}</p>
</div>
<div style="border:4px solid #000;box-shadow:8px 8px 0 #40E0D0;padding:20px;margin:20px 0;background:#fff;">
<h2 style="margin-top:0;color:#000;">{{MASTERCLASS_HEADLINE}}</h2>
<p style="margin-bottom:12px;">{{MASTERCLASS_INTRO}}</p>
{{MASTERCLASS_TOPICS}}
</div>
<div style="border:4px solid #000;box-shadow:8px 8px 0 #59473C;padding:20px;margin:20px 0;background:#fff;">
<h2 style="margin-top:0;color:#000;">BUILT FOR {{RACE_NAME}}</h2>
{{NON_NEGOTIABLES}}
<p style="margin-top:12px;margin-bottom:0;font-size:14px;">Plus: {{PLAN_WEEKS}} weeks, {{NUM_WORKOUTS}} workouts (Zwift/TrainerRoad/Wahoo/Garmin), race week protocol, gear checklist.</p>
</div>
<div style="background:#59473C;border:4px solid #000;padding:20px;margin:20px 0;color:#F5F5DC;">
---
<h2 style="margin-top:0;color:#40E0D0;">{{TIER}} | {{LEVEL}} | {{WEEKLY_HOURS}} HRS/WEEK</h2>
<p style="margin-bottom:0;">{{TIER_DESCRIPTION}}</p>
<p style="margin-top:8px;margin-bottom:0;font-size:12px;font-style:italic;">{{LEVEL_MODIFIER}}</p>
</div>
<div style="background:#000;color:#F5F5DC;padding:20px;text-align:center;border:4px solid #000;">
<div style="font-size:24px;font-weight:bold;letter-spacing:4px;">GRAVEL GOD</div>
<div style="font-size:14px;color:#40E0D0;margin:8px 0;">gravelgodcycling.com</div>
<div style="font-size:13px;font-style:italic;">Become what you are.</div>
</div>
<p style="font-size:12px;color:#59473C;text-align:center;margin-top:12px;">gravelgodcoaching@gmail.com</p>
</div>"#;

/// A rendered listing and its measurements
#[derive(Debug, Clone, Serialize)]
pub struct MarketplaceListing {
    pub variant: PlanVariant,
    pub html: String,
    /// Visible characters, tags excluded
    pub char_count: usize,
    pub over_limit: bool,
    pub copy: CopyVariations,
}

/// Masterclass teaser lines, in the race's priority order
pub fn masterclass_topics_html(race: &RaceData, copy: &CopyVariations) -> String {
    let priority = &race.masterclass_topics.priority_order;
    let shown = &priority[..priority.len().min(MAX_TOPICS)];

    let mut lines: Vec<String> = shown
        .iter()
        .filter_map(|key| copy.topic(key))
        .map(|(name, desc)| {
            format!(
                r#"<p style="margin:4px 0;"><strong>&rarr; {}:</strong> {}</p>"#,
                to_html_entities(name),
                to_html_entities(desc)
            )
        })
        .collect();

    if !shown.iter().any(|key| key == RECOVERY_TOPIC) {
        lines.push(format!(
            r#"<p style="margin-bottom:0;"><strong>&rarr; Recovery, Tires, Strength:</strong> {}</p>"#,
            to_html_entities(&copy.topic_recovery)
        ));
    }

    if lines.is_empty() {
        return r#"<p style="margin:4px 0;"><strong>&rarr; Training Guide:</strong> Comprehensive 35-page guide included</p>"#.to_string();
    }
    lines.join("\n")
}

/// Checkmarked non-negotiables, quoted or rephrased
pub fn non_negotiables_html(race: &RaceData, rephrase: bool, picker: &mut CopyPicker) -> String {
    race.non_negotiables
        .iter()
        .take(MAX_NON_NEGOTIABLES)
        .map(|nn| {
            let requirement = nn.requirement();
            let line = if rephrase {
                copy::rephrase_requirement(&requirement, race, picker)
            } else {
                format!("{} {}", copy::CHECKMARK, requirement)
            };
            format!(r#"<p style="margin:4px 0;">{}</p>"#, to_html_entities(&line))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the listing for one variant
pub fn generate_marketplace(
    race: &RaceData,
    plan: &PlanTemplate,
    variant: PlanVariant,
    settings: &MarketplaceSettings,
) -> Result<MarketplaceListing> {
    let mut picker = match settings.copy_seed {
        Some(seed) => CopyPicker::seeded(seed),
        None => CopyPicker::for_variant(race.name(), variant.tier, variant.level),
    };
    let copy = CopyVariations::generate(race, variant.tier, variant.level, &mut picker);

    let hook = race
        .race_hooks
        .punchy
        .as_deref()
        .or(race.marketplace_variables.race_hook.as_deref())
        .unwrap_or_default();
    let hook_detail = race
        .race_hooks
        .detail
        .as_deref()
        .or(race.marketplace_variables.race_hook_detail.as_deref())
        .unwrap_or_default();
    let weekly_hours = plan
        .plan_metadata
        .target_hours
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| variant.tier.weekly_hours().to_string());

    let replacements = Replacements::new()
        .with("RACE_HOOK", to_html_entities(hook))
        .with("RACE_HOOK_DETAIL", to_html_entities(hook_detail))
        .with("FIFTEEN_PLANS_HEADLINE", to_html_entities(&copy.fifteen_plans_headline))
        .with("FIFTEEN_PLANS_BODY", to_html_entities(&copy.fifteen_plans_body))
        .with("PHILOSOPHY_TAGLINE", to_html_entities(&copy.philosophy_tagline))
        .with("MASTERCLASS_HEADLINE", to_html_entities(&copy.masterclass_headline))
        .with("MASTERCLASS_INTRO", to_html_entities(&copy.masterclass_intro))
        .with("MASTERCLASS_TOPICS", masterclass_topics_html(race, &copy))
        .with("RACE_NAME", to_html_entities(race.marketplace_name()))
        .with(
            "NON_NEGOTIABLES",
            non_negotiables_html(race, settings.rephrase_non_negotiables, &mut picker),
        )
        .with("PLAN_WEEKS", variant.weeks)
        .with("NUM_WORKOUTS", variant.workout_count())
        .with("TIER", variant.tier.display_name())
        .with("LEVEL", to_html_entities(variant.level.display_name()))
        .with("WEEKLY_HOURS", weekly_hours)
        .with("TIER_DESCRIPTION", to_html_entities(&copy.tier_description))
        .with("LEVEL_MODIFIER", to_html_entities(&copy.level_modifier));

    let html = replacements.apply_strict(MARKETPLACE_TEMPLATE)?;
    let char_count = text_char_count(&html);
    let over_limit = char_count > settings.char_limit;
    if over_limit {
        warn!(
            variant = %variant,
            char_count,
            limit = settings.char_limit,
            "marketplace description over limit; consider shortening race hook or reducing masterclass topics"
        );
    } else {
        debug!(variant = %variant, char_count, "marketplace description rendered");
    }

    Ok(MarketplaceListing {
        variant,
        html,
        char_count,
        over_limit,
        copy,
    })
}
