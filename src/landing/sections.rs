//! HTML fragment renderers for each landing page section

use std::f64::consts::PI;
use std::fmt::Write as _;
use tracing::warn;

use super::data::{LandingData, MarketedPlan, RatingEntry, VITAL_FALLBACK};
use crate::copy::thousands;
use crate::models::Scalar;
use crate::plans::Tier;
use crate::template::escape_html;

const BASE_COURSE_CATEGORIES: [&str; 6] = [
    "length",
    "technicality",
    "elevation",
    "climate",
    "altitude",
    "adventure",
];

const LOGISTICS_EXPLANATION: &str =
    "Logistics rating based on course accessibility, aid station quality, and race organization.";
const DEFAULT_COURSE_QUOTE: &str = "Something will break out there. Hopefully not you.";
const DEFAULT_BLACKPILL_QUOTE: &str =
    "This race will test every assumption you have about your durability.";
const DEFAULT_SHOULD_RACE_IF: &str =
    "You value community and authentic hospitality over predictable conditions.";
const DEFAULT_SKIP_IF: &str = "You need to know exactly what you're getting into before you commit.";
const DEFAULT_SHOULD_YOU_RACE: &str = "You like hurting yourself, surprises (not the good kind), and you're prepared to commit a month of salary and (hopefully) a shit load of training getting ready for one truly insane day.";
const DEFAULT_VERDICT_SKIP: &str = "You're not ready to find out what's actually inside you.";

/// Word budget for a decision card before it is condensed
const TLDR_MAX_WORDS: usize = 60;

fn percentage(score: i64, max: i64) -> i64 {
    if max == 0 {
        return 0;
    }
    (score as f64 / max as f64 * 100.0) as i64
}

fn vital(value: Option<&Scalar>) -> String {
    value
        .map(|v| escape_html(&v.to_string()))
        .unwrap_or_else(|| VITAL_FALLBACK.to_string())
}

fn text_or_fallback(value: Option<&str>) -> String {
    value
        .map(escape_html)
        .unwrap_or_else(|| VITAL_FALLBACK.to_string())
}

pub fn hero(race: &LandingData) -> String {
    let rating = &race.gravel_god_rating;
    let tier_label = escape_html(&rating.tier_label());
    let location_badge = text_or_fallback(
        race.vitals
            .location_badge
            .as_deref()
            .or(race.vitals.location.as_deref()),
    );

    format!(
        r#"<div class="gg-hero-inner">
  <div class="gg-hero-left">
    <div class="gg-hero-badges">
      <span class="gg-hero-badge gg-hero-badge-tier">{tier_label}</span>
      <span class="gg-hero-badge gg-hero-badge-loc">{location_badge}</span>
    </div>
    <div class="gg-hero-title">{display_name}</div>
    <div class="gg-hero-quote">{tagline}</div>
  </div>
  <div class="gg-hero-right">
    <div class="gg-hero-score-card">
      <div class="gg-hero-score-label">Gravel God Rating</div>
      <div class="gg-hero-score-main">{overall}<span>/100</span></div>
      <div class="gg-hero-score-sub">{tier_label} · Iconic · High Consequence</div>
      <div class="gg-hero-score-breakdown">
        <div class="gg-hero-score-break-row">
          <span class="gg-hero-break-label">Course Profile</span>
          <div class="gg-hero-break-bar"><div class="gg-hero-break-fill" style="width: {course_pct}%;"></div></div>
          <span class="gg-hero-break-score">{course} / 50</span>
        </div>
        <div class="gg-hero-score-break-row">
          <span class="gg-hero-break-label">Biased Opinion</span>
          <div class="gg-hero-break-bar"><div class="gg-hero-break-fill" style="width: {opinion_pct}%;"></div></div>
          <span class="gg-hero-break-score">{opinion} / 50</span>
        </div>
        <div class="gg-hero-final-row">
          <span>Final Score</span>
          <span class="gg-hero-final-score">{overall} / 100</span>
        </div>
      </div>
      <div class="gg-hero-score-caption">Score based on Gravel God radar + editorial bias.</div>
    </div>
  </div>
</div>"#,
        tier_label = tier_label,
        location_badge = location_badge,
        display_name = escape_html(race.display_name()),
        tagline = escape_html(&race.tagline),
        overall = rating.overall_score,
        course = rating.course_profile,
        opinion = rating.biased_opinion,
        course_pct = percentage(rating.course_profile, 50),
        opinion_pct = percentage(rating.biased_opinion, 50),
    )
}

pub fn vitals(race: &LandingData) -> String {
    let v = &race.vitals;
    let location = match (&v.location, &v.county) {
        (Some(location), Some(county)) => escape_html(&format!("{} ({})", location, county)),
        (Some(location), None) => escape_html(location),
        _ => VITAL_FALLBACK.to_string(),
    };
    let distance = v
        .distance_mi
        .as_ref()
        .map(|d| format!("{} miles", d))
        .unwrap_or_else(|| VITAL_FALLBACK.to_string());
    let elevation = v
        .elevation_ft
        .as_ref()
        .map(|e| match e.as_i64() {
            Some(feet) => format!("~{} ft", thousands(feet)),
            None => format!("~{} ft", escape_html(&e.to_string())),
        })
        .unwrap_or_else(|| VITAL_FALLBACK.to_string());
    let terrain = if v.terrain_types.is_empty() {
        VITAL_FALLBACK.to_string()
    } else {
        escape_html(&v.terrain_types.join(", "))
    };

    let rows = [
        ("Location", location),
        ("Date", text_or_fallback(v.date_specific.as_deref())),
        ("Distance", distance),
        ("Elevation Gain", elevation),
        ("Terrain", terrain),
        ("Field Size", vital(v.field_size.as_ref())),
        ("Start Time", vital(v.start_time.as_ref())),
        ("Registration", vital(v.registration.as_ref())),
        ("Prize Purse", vital(v.prize_purse.as_ref())),
        ("Aid Stations", vital(v.aid_stations.as_ref())),
        ("Cut-off Time", vital(v.cutoff_time.as_ref())),
    ]
    .iter()
    .map(|(label, value)| format!("          <tr><th>{}</th><td>{}</td></tr>", label, value))
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        r#"<section id="race-vitals" class="gg-guide-section js-guide-section">
  <div class="gg-vitals-grid">
    <div>
      <div class="gg-vitals-pill">Quick Facts</div>
      <h2 class="gg-vitals-heading">Race Vitals</h2>
      <p class="gg-vitals-lede">The numbers that matter. Everything else is commentary.</p>
    </div>
    <div class="gg-vitals-table-wrap">
      <table class="gg-vitals-table">
        <tbody>
{rows}
        </tbody>
      </table>
    </div>
  </div>
</section>"#
    )
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Course categories in display order with their entries. Logistics comes
/// from the breakdown when present, else from the overall rating.
pub fn course_categories(race: &LandingData) -> Vec<(String, RatingEntry)> {
    let mut categories: Vec<(String, RatingEntry)> = BASE_COURSE_CATEGORIES
        .iter()
        .filter_map(|key| match race.ratings_breakdown.get(*key) {
            Some(entry) => Some((key.to_string(), entry.clone())),
            None => {
                warn!(category = key, "rating category missing from ratings_breakdown");
                None
            }
        })
        .collect();

    if let Some(entry) = race.ratings_breakdown.get("logistics") {
        categories.push(("logistics".to_string(), entry.clone()));
    } else if let Some(score) = race.gravel_god_rating.variable("logistics") {
        categories.push((
            "logistics".to_string(),
            RatingEntry {
                score,
                explanation: LOGISTICS_EXPLANATION.to_string(),
            },
        ));
    }
    categories
}

/// Radar geometry on a 320x320 viewBox
pub struct Radar {
    pub center: f64,
    pub radius: f64,
    pub max_score: f64,
    pub rings: usize,
}

impl Default for Radar {
    fn default() -> Self {
        Self {
            center: 160.0,
            radius: 110.0,
            max_score: 5.0,
            rings: 4,
        }
    }
}

impl Radar {
    fn polar(&self, index: usize, count: usize, r: f64) -> (f64, f64, f64) {
        let angle_deg = 360.0 / count as f64 * index as f64 - 90.0;
        let a = angle_deg * PI / 180.0;
        (self.center + r * a.cos(), self.center + r * a.sin(), angle_deg)
    }

    fn path(&self, radii: impl Iterator<Item = f64>, count: usize) -> String {
        let mut d = String::new();
        for (i, r) in radii.enumerate() {
            let (x, y, _) = self.polar(i, count, r);
            let _ = write!(d, "{}{:.2},{:.2} ", if i == 0 { 'M' } else { 'L' }, x, y);
        }
        d.push('Z');
        d
    }

    /// Static SVG for `(label, score)` metrics
    pub fn render(&self, metrics: &[(String, i64)]) -> String {
        let n = metrics.len();
        if n < 3 {
            return r#"<svg class="gg-course-radar-svg" viewBox="0 0 320 320"></svg>"#.to_string();
        }

        let mut svg = String::from(
            r#"<svg class="gg-course-radar-svg" viewBox="0 0 320 320" xmlns="http://www.w3.org/2000/svg">"#,
        );
        for ring in 1..=self.rings {
            let r = self.radius * ring as f64 / self.rings as f64;
            let _ = write!(
                svg,
                r#"<path d="{}" class="gg-radar-grid-ring"/>"#,
                self.path(std::iter::repeat(r).take(n), n)
            );
        }
        for (i, (label, _)) in metrics.iter().enumerate() {
            let (ex, ey, angle) = self.polar(i, n, self.radius);
            let _ = write!(
                svg,
                r#"<line x1="{c:.2}" y1="{c:.2}" x2="{ex:.2}" y2="{ey:.2}" class="gg-radar-axis-line"/>"#,
                c = self.center
            );
            let (lx, ly, _) = self.polar(i, n, self.radius + 24.0);
            let anchor = if angle > 90.0 && angle < 270.0 { "end" } else { "start" };
            let _ = write!(
                svg,
                r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}" dominant-baseline="middle" class="gg-radar-label">{}</text>"#,
                escape_html(&label.to_uppercase())
            );
        }
        let radii = metrics
            .iter()
            .map(|(_, score)| *score as f64 / self.max_score * self.radius);
        let _ = write!(
            svg,
            r#"<path d="{}" class="gg-radar-data-fill"/>"#,
            self.path(radii, n)
        );
        svg.push_str("</svg>");
        svg
    }
}

pub fn ratings(race: &LandingData) -> String {
    let categories = course_categories(race);
    let raw_course_score: i64 = categories.iter().map(|(_, e)| e.score).sum();

    let profile_rows = categories
        .iter()
        .map(|(key, entry)| {
            format!(
                r#"        <div class="gg-course-metric-row">
          <span class="gg-course-metric-label">{}</span>
          <div class="gg-rating-bar"><div class="gg-rating-bar-fill" style="width: {}%;"></div></div>
          <span class="gg-course-metric-score">{}/5</span>
        </div>"#,
                title_case(key),
                percentage(entry.score, 5),
                entry.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let explanations = categories
        .iter()
        .map(|(key, entry)| {
            format!(
                "      <h3 class=\"gg-subheading\">{}</h3>\n      <p>{}</p>",
                title_case(key),
                escape_html(&entry.explanation)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let metrics: Vec<(String, i64)> = categories
        .iter()
        .map(|(key, entry)| (title_case(key), entry.score))
        .collect();
    let radar = Radar::default().render(&metrics);

    let quote = race
        .black_pill
        .as_ref()
        .and_then(|bp| bp.quote.as_deref())
        .or(race.final_verdict.one_liner.as_deref())
        .unwrap_or(DEFAULT_COURSE_QUOTE);

    format!(
        r#"<section class="gg-section gg-ratings-section" id="course-ratings">
  <div class="gg-ratings-header">
    <div class="gg-pill"><span class="gg-pill-icon">◆</span><span>WHAT THE COURSE IS LIKE</span></div>
    <h2 class="gg-section-title">THE RATINGS</h2>
  </div>
  <div class="gg-ratings-grid">
    <div class="gg-ratings-left">
      <div class="gg-radar-card">
        <div class="gg-radar-header">
          <div class="gg-radar-title">Gravel God Radar</div>
          <div class="gg-radar-pill"><span>{race_name}</span></div>
        </div>
        {radar}
      </div>
      <div class="gg-course-profile-card">
        <div class="gg-course-profile-title">Course Profile</div>
        <div class="gg-course-profile-meta">
          Seven variables · 1–5 scale &nbsp;&nbsp;|&nbsp;&nbsp;
          Raw Course Score: <strong>{raw_course_score} / 35</strong>
        </div>
{profile_rows}
      </div>
      <div class="gg-course-quote-big"><span>"{quote}"</span></div>
    </div>
    <div class="gg-ratings-right">
{explanations}
    </div>
  </div>
</section>"#,
        race_name = escape_html(race.display_name()),
        quote = escape_html(quote),
    )
}

pub fn black_pill(race: &LandingData) -> Option<String> {
    let bp = race.black_pill.as_ref()?;
    let consequences = bp
        .consequences
        .iter()
        .map(|c| format!("<li>{}</li>", escape_html(c)))
        .collect::<Vec<_>>()
        .join("\n      ");
    let quote = bp
        .quote
        .as_deref()
        .or(race.final_verdict.one_liner.as_deref())
        .unwrap_or(DEFAULT_BLACKPILL_QUOTE);

    Some(format!(
        r#"<section class="gg-blackpill-section">
  <div class="gg-blackpill-badge"><span class="gg-blackpill-badge-icon">◆</span> THE BLACK PILL</div>
  <h3 class="gg-blackpill-heading">{title}</h3>
  <div class="gg-blackpill-body">
    <p><strong>{reality}</strong></p>
    <p><strong>Here's what it actually costs:</strong></p>
    <ul>
      {consequences}
    </ul>
    <p><strong>{reset}</strong></p>
  </div>
  <div class="gg-blackpill-quote">{quote}</div>
</section>"#,
        title = escape_html(&bp.title),
        reality = escape_html(&bp.reality),
        reset = escape_html(&bp.expectation_reset),
        quote = escape_html(quote),
    ))
}

pub fn course_map(race: &LandingData) -> Option<String> {
    let course = &race.course_description;
    let route_id = course.ridewithgps_id.as_ref()?;
    let route_name = course.ridewithgps_name.as_deref().unwrap_or(race.display_name());

    let zones = course
        .suffering_zones
        .iter()
        .map(|zone| {
            let mut parts = vec![escape_html(&zone.desc)];
            if let Some(named) = &zone.named_section {
                parts.push(format!("<strong>{}</strong>", escape_html(named)));
            }
            if let Some(terrain) = &zone.terrain_detail {
                parts.push(escape_html(terrain));
            }
            if let Some(weather) = &zone.weather_note {
                parts.push(format!("<em>{}</em>", escape_html(weather)));
            }
            let citation = zone
                .citation
                .as_ref()
                .map(|c| format!(r#"<div class="gg-zone-citation">Source: {}</div>"#, escape_html(c)))
                .unwrap_or_default();
            format!(
                r#"        <div class="gg-zone-card">
          <div class="gg-zone-mile">Mile {}</div>
          <div class="gg-zone-label">{}</div>
          <div class="gg-zone-desc">{}</div>
          {}
        </div>"#,
                zone.mile,
                escape_html(&zone.label),
                parts.join(" "),
                citation
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let distance = race
        .vitals
        .distance_mi
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let city = race
        .vitals
        .location
        .as_deref()
        .and_then(|l| l.split(',').next())
        .unwrap_or_default()
        .trim()
        .to_uppercase();

    Some(format!(
        r#"<section class="gg-route-section js-guide-section" id="course-map">
  <div class="gg-route-card">
    <div class="gg-route-card-inner">
      <header class="gg-route-header">
        <span class="gg-pill gg-pill--small">Course Map</span>
        <h2 class="gg-route-title">WHAT {distance} MILES OF {city} ACTUALLY LOOKS LIKE</h2>
        <p class="gg-route-lede">Hover over the profile to see where the climbs, chaos, and "why did I sign up for this" moments actually are.</p>
      </header>
      <div class="gg-route-frame-wrap">
        <iframe src="https://ridewithgps.com/embeds?type=route&amp;id={route_id}&amp;title={route_name}&amp;sampleGraph=true&amp;distanceMarkers=true" style="width: 1px; min-width: 100%; height: 650px; border: none;" scrolling="no"></iframe>
      </div>
      <div class="gg-suffering-zones">
{zones}
      </div>
      <footer class="gg-route-caption">Elevation + route courtesy of RideWithGPS. Suffering courtesy of you.</footer>
    </div>
  </div>
</section>"#,
        distance = escape_html(&distance),
        city = escape_html(&city),
        route_id = escape_html(&route_id.to_string()),
        route_name = escape_html(route_name),
    ))
}

pub fn overview_hero(race: &LandingData) -> String {
    let distance = race
        .vitals
        .distance_mi
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "all the".to_string());
    let character = race
        .course_description
        .character
        .as_deref()
        .unwrap_or("gravel")
        .to_lowercase();

    format!(
        r#"<section class="gg-overview-hero-v2">
  <div class="gg-overview-badge">Race Guide</div>
  <h1 class="gg-overview-title-v2">{title}<br>OVERVIEW &amp; TRAINING GUIDE</h1>
  <p class="gg-overview-lede-v2">{tagline}</p>
  <p class="gg-overview-body-v2">This page is your briefing: what the race actually is, how it breaks riders, and how to show up with a body and brain that can survive {distance} miles of {character}.</p>
</section>"#,
        title = escape_html(&race.display_name().to_uppercase()),
        tagline = escape_html(&race.tagline),
        distance = escape_html(&distance),
        character = escape_html(&character),
    )
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn first_sentences(sentences: &[&str], count: usize) -> String {
    format!("{}.", sentences[..count.min(sentences.len())].join(". "))
}

/// Shorten a "should you race" verdict to a decision-card sentence or two
pub fn condense_should_race(text: &str) -> String {
    if word_count(text) <= TLDR_MAX_WORDS {
        return text.to_string();
    }
    let sentences: Vec<&str> = text.split(". ").collect();
    if sentences.len() >= 2 {
        let two = first_sentences(&sentences, 2);
        if word_count(&two) > TLDR_MAX_WORDS {
            first_sentences(&sentences, 1)
        } else {
            two
        }
    } else if text.to_lowercase().contains("value") {
        let head = text.split('—').next().unwrap_or(text);
        format!("{}.", head.trim())
    } else {
        text.to_string()
    }
}

/// The "reconsider" half of a verdict, when it has one
pub fn skip_if_from_verdict(text: &str) -> String {
    if !text.to_lowercase().contains("reconsider") {
        return DEFAULT_VERDICT_SKIP.to_string();
    }
    let Some(skip_part) = text.split('—').nth(1).map(str::trim) else {
        return DEFAULT_VERDICT_SKIP.to_string();
    };
    let sentences: Vec<&str> = skip_part.split(". ").collect();
    let skip = if sentences.len() >= 2 {
        first_sentences(&sentences, 2)
    } else {
        skip_part.to_string()
    };
    if word_count(&skip) > TLDR_MAX_WORDS {
        first_sentences(&sentences, 1)
    } else {
        skip
    }
}

pub fn tldr(race: &LandingData) -> String {
    let (should_race, skip_if) = match &race.tldr {
        Some(tldr) => (
            tldr.should_race_if
                .clone()
                .unwrap_or_else(|| DEFAULT_SHOULD_RACE_IF.to_string()),
            tldr.skip_if
                .clone()
                .unwrap_or_else(|| DEFAULT_SKIP_IF.to_string()),
        ),
        None => {
            let verdict = race
                .final_verdict
                .should_you_race
                .as_deref()
                .unwrap_or(DEFAULT_SHOULD_YOU_RACE);
            (condense_should_race(verdict), skip_if_from_verdict(verdict))
        }
    };

    format!(
        r##"<div class="gg-decision-grid">
  <div class="gg-decision-card gg-decision-card--yes">
    <h3>You Should Race This If:</h3>
    <p>{}</p>
    <a href="#training" class="gg-decision-cta">Get a Training Plan →</a>
  </div>
  <div class="gg-decision-card gg-decision-card--no">
    <h3>Skip This If:</h3>
    <p>{}</p>
  </div>
</div>"##,
        escape_html(&should_race),
        escape_html(&skip_if)
    )
}

pub fn logistics(race: &LandingData) -> Option<String> {
    let l = race.logistics.as_ref()?;
    let transportation = l.lodging_strategy.split('.').next().unwrap_or_default();

    Some(format!(
        r#"<section class="gg-logistics-section">
  <div class="gg-logistics-inner">
    <div>
      <div class="gg-logistics-pill">Race Logistics</div>
      <h3 class="gg-logistics-heading">The unsexy details that decide your day</h3>
      <div>
        <div class="gg-logistics-list-title">Getting There</div>
        <ul class="gg-logistics-list">
          <li><strong>Closest major airport:</strong> {airport}</li>
          <li><strong>Transportation:</strong> {transportation}.</li>
          <li><strong>When to arrive:</strong> Plan to arrive 2-3 days early for travel, shakeout, and gear organization.</li>
        </ul>
      </div>
      <div>
        <div class="gg-logistics-list-title">Staying There</div>
        <ul class="gg-logistics-list">
          <li><strong>Lodging:</strong> {lodging}</li>
          <li><strong>Food &amp; groceries:</strong> {food}</li>
          <li><strong>Packet pickup:</strong> {pickup}</li>
          <li><strong>Parking:</strong> {parking}</li>
        </ul>
      </div>
    </div>
    <aside>
      <div class="gg-logistics-links">
        <div class="gg-logistics-card">
          <div class="gg-logistics-card-title">Official race info</div>
          <a href="{site}" target="_blank" rel="noopener">Course details, rules &amp; latest updates →</a>
        </div>
      </div>
      <div class="gg-logistics-disclaimer">This guide is my opinion as a coach and racer, not the official word from the event organizers. Details change. Always double-check the <strong>official race website</strong> and pre-race communication before you travel or make big decisions.</div>
    </aside>
  </div>
</section>"#,
        airport = escape_html(&l.airport),
        transportation = escape_html(transportation.trim()),
        lodging = escape_html(&l.lodging_strategy),
        food = escape_html(&l.food),
        pickup = escape_html(&l.packet_pickup),
        parking = escape_html(&l.parking),
        site = escape_html(&l.official_site),
    ))
}

/// Weekly hours shown on a landing volume card
pub fn volume_hours(tier: Tier) -> &'static str {
    match tier {
        Tier::Ayahuasca => "0–5 hrs / week",
        Tier::Finisher => "8–12 hrs / week",
        Tier::Compete => "12–18 hrs / week",
        Tier::Podium => "18–25+ hrs / week",
    }
}

pub fn volume_footer(tier: Tier) -> &'static str {
    match tier {
        Tier::Ayahuasca => "For chaos schedules and stubborn goals. You train when you can, not when you \"should\".",
        Tier::Finisher => "For grown-ups with real lives who want to cross the line proud, not shattered.",
        Tier::Compete => "For hitters who want to be in the moves, not just in the photo dump.",
        Tier::Podium => "For psychos who plan vacations around watts, weather, and start lists.",
    }
}

fn plan_card(plan: &MarketedPlan, base_url: &str) -> String {
    format!(
        r#"        <div class="gg-plan">
          <div class="gg-plan-name">{} – {} <span>({} weeks)</span></div>
          <a href="{}" class="gg-plan-cta" target="_blank">View Plan</a>
        </div>"#,
        escape_html(plan.level_display()),
        escape_html(&plan.name),
        plan.weeks,
        escape_html(&plan.url(base_url))
    )
}

pub fn training_plans(race: &LandingData) -> Option<String> {
    let tp = race.training_plans.as_ref()?;

    let mut grouped: Vec<(Tier, Vec<&MarketedPlan>)> =
        Tier::ALL.iter().map(|t| (*t, Vec::new())).collect();
    for plan in &tp.plans {
        match plan.tier.parse::<Tier>() {
            Ok(tier) => {
                if let Some((_, plans)) = grouped.iter_mut().find(|(t, _)| *t == tier) {
                    plans.push(plan);
                }
            }
            Err(_) => warn!(tier = %plan.tier, plan = %plan.name, "unknown tier on marketed plan"),
        }
    }

    let cards = grouped
        .iter()
        .filter(|(_, plans)| !plans.is_empty())
        .map(|(tier, plans)| {
            let stack = plans
                .iter()
                .map(|p| plan_card(p, &tp.marketplace_base_url))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"    <article class="gg-volume-card">
      <div class="gg-volume-tag">Volume Track</div>
      <h3 class="gg-volume-title">{}</h3>
      <div class="gg-volume-hours">{}</div>
      <div class="gg-volume-divider"></div>
      <div class="gg-plan-stack">
{}
      </div>
      <div class="gg-volume-footer">{}</div>
    </article>"#,
                tier.display_name(),
                volume_hours(*tier),
                stack,
                escape_html(volume_footer(*tier))
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    Some(format!(
        r#"<section class="gg-volume-section" id="volume-tracks">
  <div class="gg-training-plans-badge"><span class="gg-training-plans-badge-icon">◆</span> TRAINING PLANS</div>
  <div class="gg-volume-grid">
{cards}
  </div>
</section>"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landing::data::LandingDocument;
    use serde_json::json;

    fn race() -> LandingData {
        let doc: LandingDocument = serde_json::from_value(json!({
            "race": {
                "name": "Unbound 200",
                "display_name": "Unbound Gravel 200",
                "tagline": "Flint Hills & heat.",
                "vitals": {
                    "location": "Emporia, Kansas", "county": "Lyon County", "location_badge": "EMPORIA, KS",
                    "distance_mi": 200, "elevation_ft": 11000, "terrain_types": ["Flint rock", "Cattle grates"]
                },
                "gravel_god_rating": {"overall_score": 93, "course_profile": 31, "biased_opinion": 34, "tier": 1, "tier_label": "TIER 1", "logistics": 4},
                "ratings_breakdown": {
                    "length": {"score": 5, "explanation": "200 miles."},
                    "technicality": {"score": 4, "explanation": "Flint."},
                    "elevation": {"score": 4, "explanation": "Rollers."},
                    "climate": {"score": 5, "explanation": "Heat."},
                    "altitude": {"score": 1, "explanation": "Sea level-ish."},
                    "adventure": {"score": 5, "explanation": "Remote."}
                },
                "course_description": {
                    "character": "Relentless Rollers", "ridewithgps_id": 4567, "ridewithgps_name": "Unbound 200",
                    "suffering_zones": [{"mile": 80, "label": "Teterville", "desc": "Chunk.", "named_section": "Teterville Road", "citation": "Race report"}]
                },
                "final_verdict": {"one_liner": "Bring spare tubes."},
                "training_plans": {
                    "marketplace_base_url": "https://tp.example/plans",
                    "plans": [
                        {"tier": "Finisher", "level": "Beginner", "name": "Finisher Beginner", "weeks": 12, "tp_id": 1, "tp_slug": "fb"},
                        {"tier": "Podium", "level": "Emergency", "name": "Podium SMR", "weeks": 6, "tp_id": 2, "tp_slug": "psmr"}
                    ]
                }
            }
        }))
        .unwrap();
        doc.race
    }

    #[test]
    fn test_hero_scores() {
        let html = hero(&race());
        assert!(html.contains("gg-hero-inner"));
        assert!(html.contains("width: 62%;"));
        assert!(html.contains("width: 68%;"));
        assert!(html.contains("TIER 1 · Iconic · High Consequence"));
        assert!(html.contains("Flint Hills &amp; heat."));
    }

    #[test]
    fn test_vitals_fallbacks() {
        let html = vitals(&race());
        assert!(html.contains("<td>Emporia, Kansas (Lyon County)</td>"));
        assert!(html.contains("<td>~11,000 ft</td>"));
        assert!(html.contains("<td>Flint rock, Cattle grates</td>"));
        assert!(html.contains(&format!("<tr><th>Prize Purse</th><td>{}</td></tr>", VITAL_FALLBACK)));
        assert!(!html.contains("TBD"));
    }

    #[test]
    fn test_ratings_with_rating_logistics() {
        let race = race();
        let categories = course_categories(&race);
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[6].1.explanation, LOGISTICS_EXPLANATION);

        let html = ratings(&race);
        assert!(html.contains("<strong>28 / 35</strong>"));
        assert!(html.contains("gg-radar-data-fill"));
        assert_eq!(html.matches("gg-radar-grid-ring").count(), 4);
        assert!(html.contains("\"Bring spare tubes.\""));
    }

    #[test]
    fn test_radar_geometry() {
        let metrics: Vec<(String, i64)> = (0..4).map(|i| (format!("m{}", i), 5)).collect();
        let svg = Radar::default().render(&metrics);
        // First vertex sits straight above the center at full radius
        assert!(svg.contains(r#"<path d="M160.00,50.00 L270.00,160.00 L160.00,270.00 L50.00,160.00 Z" class="gg-radar-data-fill"/>"#));
        assert!(svg.contains(r#"text-anchor="end""#));
    }

    #[test]
    fn test_course_map_and_optional_sections() {
        let race = race();
        let html = course_map(&race).unwrap();
        assert!(html.contains("WHAT 200 MILES OF EMPORIA ACTUALLY LOOKS LIKE"));
        assert!(html.contains("Chunk. <strong>Teterville Road</strong>"));
        assert!(html.contains("Source: Race report"));
        assert!(black_pill(&race).is_none());
        assert!(logistics(&race).is_none());
    }

    #[test]
    fn test_training_plan_cards() {
        let html = training_plans(&race()).unwrap();
        assert!(html.contains("https://tp.example/plans/gran-fondo-century/1/fb"));
        assert!(html.contains("Save My Race – Podium SMR <span>(6 weeks)</span>"));
        assert!(html.contains("18–25+ hrs / week"));
        assert!(!html.contains("Compete</h3>"));
    }

    #[test]
    fn test_tldr_condensing() {
        let long = format!(
            "{}. Second sentence here. {}.",
            "word ".repeat(30).trim(),
            "more ".repeat(40).trim()
        );
        let condensed = condense_should_race(&long);
        assert!(condensed.ends_with("Second sentence here."));

        let verdict = "Race it if you love wind — reconsider if you hate heat. Or mud. Or both.";
        assert_eq!(skip_if_from_verdict(verdict), "reconsider if you hate heat. Or mud.");
        assert_eq!(skip_if_from_verdict("Just race it."), DEFAULT_VERDICT_SKIP);

        let html = tldr(&race());
        assert!(html.contains("gg-decision-grid"));
    }
}
