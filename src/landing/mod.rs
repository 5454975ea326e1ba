//! Race landing page
//!
//! Sections render to standalone HTML fragments. They can be written as one
//! preview page, or spliced into an Elementor export by replacing the HTML
//! widget that currently holds each section.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{GravelKitError, OutputError, Result, TemplateError};

pub mod data;
pub mod elementor;
pub mod sections;

pub use data::{LandingData, LandingDocument};

/// Landing page sections in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingSection {
    Hero,
    Vitals,
    Ratings,
    BlackPill,
    TrainingPlans,
    CourseMap,
    OverviewHero,
    Tldr,
    Logistics,
}

impl LandingSection {
    pub const ALL: [LandingSection; 9] = [
        LandingSection::Hero,
        LandingSection::Vitals,
        LandingSection::Ratings,
        LandingSection::BlackPill,
        LandingSection::TrainingPlans,
        LandingSection::CourseMap,
        LandingSection::OverviewHero,
        LandingSection::Tldr,
        LandingSection::Logistics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LandingSection::Hero => "hero",
            LandingSection::Vitals => "vitals",
            LandingSection::Ratings => "ratings",
            LandingSection::BlackPill => "black pill",
            LandingSection::TrainingPlans => "training plans",
            LandingSection::CourseMap => "course map",
            LandingSection::OverviewHero => "overview hero",
            LandingSection::Tldr => "TL;DR",
            LandingSection::Logistics => "logistics",
        }
    }

    /// Markup fragment that identifies the section's widget
    pub fn marker(&self) -> &'static str {
        match self {
            LandingSection::Hero => "gg-hero-inner",
            LandingSection::Vitals => "id=\"race-vitals\"",
            LandingSection::Ratings => "id=\"course-ratings\"",
            LandingSection::BlackPill => "gg-blackpill-section",
            LandingSection::TrainingPlans => "gg-volume-section",
            LandingSection::CourseMap => "gg-route-section",
            LandingSection::OverviewHero => "gg-overview-hero-v2",
            LandingSection::Tldr => "gg-decision-grid",
            LandingSection::Logistics => "gg-logistics-section",
        }
    }

    /// `_element_id` the widget may carry
    pub fn element_id(&self) -> Option<&'static str> {
        match self {
            LandingSection::Hero | LandingSection::OverviewHero => None,
            LandingSection::Vitals => Some("vitals"),
            LandingSection::Ratings => Some("course"),
            LandingSection::BlackPill => Some("blackpill"),
            LandingSection::TrainingPlans => Some("training"),
            LandingSection::CourseMap => Some("course-map"),
            LandingSection::Tldr => Some("tldr"),
            LandingSection::Logistics => Some("logistics"),
        }
    }

    /// Render the section; `None` when the race record lacks its data
    pub fn render(&self, race: &LandingData) -> Option<String> {
        match self {
            LandingSection::Hero => Some(sections::hero(race)),
            LandingSection::Vitals => Some(sections::vitals(race)),
            LandingSection::Ratings => Some(sections::ratings(race)),
            LandingSection::BlackPill => sections::black_pill(race),
            LandingSection::TrainingPlans => sections::training_plans(race),
            LandingSection::CourseMap => sections::course_map(race),
            LandingSection::OverviewHero => Some(sections::overview_hero(race)),
            LandingSection::Tldr => Some(sections::tldr(race)),
            LandingSection::Logistics => sections::logistics(race),
        }
    }
}

/// Every section the race record supports, in page order
pub fn render_sections(race: &LandingData) -> Vec<(LandingSection, String)> {
    LandingSection::ALL
        .iter()
        .filter_map(|section| match section.render(race) {
            Some(html) => Some((*section, html)),
            None => {
                warn!(section = section.label(), race = %race.name, "section skipped, no data");
                None
            }
        })
        .collect()
}

/// Standalone preview page with all sections
pub fn render_preview(race: &LandingData) -> String {
    let body = render_sections(race)
        .into_iter()
        .map(|(_, html)| html)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{} Landing Page</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        crate::template::escape_html(race.display_name()),
        body
    )
}

/// Result of splicing sections into an Elementor export
#[derive(Debug, Clone, Serialize)]
pub struct ElementorBuild {
    pub document: Value,
    pub replaced: Vec<LandingSection>,
    /// Sections whose widget was not found or whose data was missing
    pub missing: Vec<LandingSection>,
}

/// Replace each section's widget in `base` and retitle the page
pub fn build_elementor(race: &LandingData, mut base: Value) -> Result<ElementorBuild> {
    if !base.is_object() {
        return Err(TemplateError::InvalidBase {
            reason: "Elementor export must be a JSON object".to_string(),
        }
        .into());
    }

    let rendered = render_sections(race);
    let mut replaced = Vec::new();
    let mut missing: Vec<LandingSection> = LandingSection::ALL
        .iter()
        .copied()
        .filter(|s| !rendered.iter().any(|(r, _)| r == s))
        .collect();

    for (section, html) in &rendered {
        if elementor::replace_widget_html(&mut base, section.marker(), html, section.element_id()) {
            replaced.push(*section);
        } else {
            let err = GravelKitError::from(TemplateError::WidgetNotFound {
                selector: section.marker().to_string(),
            });
            warn!(section = section.label(), "{}", err);
            missing.push(*section);
        }
    }

    if let Some(obj) = base.as_object_mut() {
        obj.insert(
            "title".to_string(),
            Value::String(format!("{} Landing Page", race.display_name())),
        );
    }

    Ok(ElementorBuild {
        document: base,
        replaced,
        missing,
    })
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OutputError::CreateDir {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    fs::write(path, content).map_err(|e| OutputError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Write the landing page: Elementor JSON when `base` is given, else the
/// HTML preview. Returns the sections that could not be placed.
pub fn write_landing(
    race: &LandingData,
    base: Option<&Path>,
    output: &Path,
) -> Result<(PathBuf, Vec<LandingSection>)> {
    let missing = match base {
        Some(base_path) => {
            let base_doc: Value = crate::models::load_json(base_path)?;
            let build = build_elementor(race, base_doc)?;
            write_file(output, &serde_json::to_string_pretty(&build.document)?)?;
            build.missing
        }
        None => {
            write_file(output, &render_preview(race))?;
            Vec::new()
        }
    };
    info!(path = %output.display(), race = %race.name, "landing page written");
    Ok((output.to_path_buf(), missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn race() -> LandingData {
        serde_json::from_value(json!({
            "name": "Mid South",
            "display_name": "The Mid South",
            "tagline": "Red dirt.",
            "vitals": {"location": "Stillwater, Oklahoma", "distance_mi": 100},
            "logistics": {"airport": "OKC", "lodging_strategy": "Book early. Stillwater fills up.", "food": "Plenty", "packet_pickup": "Friday", "parking": "Downtown", "official_site": "https://example.com"}
        }))
        .unwrap()
    }

    #[test]
    fn test_sections_without_data_are_skipped() {
        let rendered = render_sections(&race());
        let kinds: Vec<_> = rendered.iter().map(|(s, _)| *s).collect();
        assert!(kinds.contains(&LandingSection::Logistics));
        assert!(!kinds.contains(&LandingSection::BlackPill));
        assert!(!kinds.contains(&LandingSection::CourseMap));
        for (section, html) in &rendered {
            assert!(html.contains(section.marker()), "{:?}", section);
        }
    }

    #[test]
    fn test_build_elementor() {
        let base = json!({
            "title": "Template",
            "content": [{"elements": [
                {"widgetType": "html", "settings": {"html": "<div class=\"gg-hero-inner\"></div>"}},
                {"widgetType": "html", "settings": {"_element_id": "logistics", "html": ""}}
            ]}]
        });
        let build = build_elementor(&race(), base).unwrap();
        assert_eq!(build.document["title"], "The Mid South Landing Page");
        assert!(build.replaced.contains(&LandingSection::Hero));
        assert!(build.replaced.contains(&LandingSection::Logistics));
        assert!(build.missing.contains(&LandingSection::Vitals));
        assert!(build.missing.contains(&LandingSection::BlackPill));
        assert!(build_elementor(&race(), json!([])).is_err());
    }

    #[test]
    fn test_write_preview() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("landing").join("mid_south.html");
        let (path, missing) = write_landing(&race(), None, &out).unwrap();
        assert!(missing.is_empty());
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("<title>The Mid South Landing Page</title>"));
        assert!(html.contains("THE MID SOUTH<br>OVERVIEW"));
    }
}
