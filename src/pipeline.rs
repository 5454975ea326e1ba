//! Full race generation
//!
//! For each of the 15 plan variants: ZWO workouts, the marketplace listing
//! and the training guide, all under one race folder:
//!
//! ```text
//! <root>/<race>/race_data.json
//! <root>/<race>/guides/<tier>_<level>_guide.html
//! <root>/<race>/<n>. <Tier> <Level> (<w> weeks)/marketplace_description.html
//! <root>/<race>/<n>. <Tier> <Level> (<w> weeks)/workouts/*.zwo
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::archetype::{generate_blocks, Archetype, Level};
use crate::config::AppConfig;
use crate::description::DescriptionRequest;
use crate::enrichment::Enricher;
use crate::error::{DataError, ErrorSeverity, GravelKitError, OutputError, Result};
use crate::guide::write_guide;
use crate::logging::RunReport;
use crate::marketplace::generate_marketplace;
use crate::models::{PlanTemplate, RaceData, Workout};
use crate::plans::{PlanVariant, PLAN_VARIANTS};
use crate::threshold_block::block_workouts;
use crate::validate::marketplace::LISTING_FILE;
use crate::zwo::{parse_blocks, zwo_filename, Block, ZwoDocument, DEFAULT_BLOCKS};

pub const WORKOUTS_DIR: &str = "workouts";
pub const PLAN_TEMPLATE_FILE: &str = "template.json";
pub const RACE_DATA_FILE: &str = "race_data.json";

/// Files written (or left alone) for one plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    pub written: usize,
    pub skipped: usize,
}

impl WriteStats {
    fn add(&mut self, other: WriteStats) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

/// What one variant produced
#[derive(Debug, Clone, Serialize)]
pub struct VariantOutput {
    pub variant: PlanVariant,
    pub workouts: WriteStats,
    pub marketplace: PathBuf,
    pub marketplace_chars: usize,
    pub guide: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub race_folder: PathBuf,
    pub variants: Vec<VariantOutput>,
    /// Variants that could not be generated, with the reason
    pub failed: Vec<(PlanVariant, String)>,
    pub report: Option<PathBuf>,
}

impl GenerationSummary {
    pub fn total_workouts(&self) -> WriteStats {
        let mut total = WriteStats::default();
        for v in &self.variants {
            total.add(v.workouts);
        }
        total
    }
}

/// Folder name for a race. Path separators become `-`; names that would
/// resolve to the output root or its parent are rejected.
pub fn race_folder_name(race: &RaceData) -> Result<String> {
    let folder = race.name().replace(['/', '\\'], "-").trim().to_string();
    if folder.chars().all(|c| c == '.') {
        return Err(DataError::InvalidRaceName {
            name: race.name().to_string(),
        }
        .into());
    }
    Ok(folder)
}

/// Blocks for a workout: its own fragment, else its archetype's blocks, else
/// a single free ride
pub fn workout_blocks(workout: &Workout) -> Result<Vec<Block>> {
    if let Some(fragment) = workout.blocks.as_deref() {
        let blocks = parse_blocks(fragment)?;
        if !blocks.is_empty() {
            return Ok(blocks);
        }
    }

    if let Some(archetype) = workout.archetype.as_deref() {
        let level = workout.level.unwrap_or(Level::MIN);
        let fragment = generate_blocks(archetype, level);
        if fragment.is_empty() {
            warn!(
                workout = %workout.name,
                archetype,
                level,
                "unknown archetype or level, using a free ride"
            );
        } else {
            return parse_blocks(&fragment);
        }
    }

    parse_blocks(DEFAULT_BLOCKS)
}

fn write_if_allowed(path: &Path, overwrite: bool, write: impl FnOnce() -> Result<()>) -> Result<bool> {
    if !overwrite && path.exists() {
        debug!(path = %path.display(), "exists, skipped");
        return Ok(false);
    }
    write()?;
    Ok(true)
}

/// Write every workout of `plan` as a `.zwo` file under `dir/workouts`
pub fn write_plan_workouts(
    race: &RaceData,
    plan: &PlanTemplate,
    variant: PlanVariant,
    dir: &Path,
    author: &str,
    overwrite: bool,
) -> Result<WriteStats> {
    let workouts_dir = dir.join(WORKOUTS_DIR);
    fs::create_dir_all(&workouts_dir).map_err(|e| OutputError::CreateDir {
        path: workouts_dir.clone(),
        reason: e.to_string(),
    })?;

    let enricher = Enricher::new(race, variant.tier);
    let mut stats = WriteStats::default();

    for week in &plan.weeks {
        for (block_option, workout) in week.entries() {
            let path = workouts_dir.join(zwo_filename(&workout.name, block_option));
            let written = write_if_allowed(&path, overwrite, || {
                let blocks = workout_blocks(workout)?;
                let minutes = crate::zwo::estimate_duration(&blocks) / 60;

                let mut source = workout.clone();
                if source.description.trim().is_empty() {
                    let mut request = DescriptionRequest::new(&workout.name, &blocks);
                    if let Some(level) = workout.level {
                        request = request.level(level);
                    }
                    source.description = request.build();
                }
                let description = enricher.enrich(&source, week.week_number, minutes);

                ZwoDocument::new(workout.name.as_str(), description, blocks)
                    .with_author(author)
                    .write_to(&path)
            })?;
            if written {
                stats.written += 1;
            } else {
                stats.skipped += 1;
            }
        }
    }

    debug!(variant = %variant, written = stats.written, skipped = stats.skipped, "workouts done");
    Ok(stats)
}

/// One ZWO file per archetype and level, grouped in a folder per archetype
pub fn write_archetype_examples(dir: &Path, author: &str) -> Result<usize> {
    let mut count = 0;
    for archetype in Archetype::ALL {
        let archetype_dir = dir.join(archetype.example_dir_name());
        for level in Level::all() {
            let name = archetype.workout_name(level);
            let blocks = parse_blocks(&archetype.blocks(level))?;
            let description = DescriptionRequest::new(&name, &blocks)
                .level(level.get())
                .pattern(archetype.into())
                .build();
            ZwoDocument::new(name.as_str(), description, blocks)
                .with_author(author)
                .write_to(&archetype_dir.join(archetype.example_filename(level)))?;
            count += 1;
        }
    }
    info!(count, dir = %dir.display(), "archetype examples written");
    Ok(count)
}

/// The twelve double-threshold block workouts, written flat into `dir`
pub fn write_double_threshold_block(dir: &Path, author: &str) -> Result<usize> {
    let mut count = 0;
    for workout in block_workouts() {
        workout
            .document(author)?
            .write_to(&dir.join(workout.filename()))?;
        count += 1;
    }
    info!(count, dir = %dir.display(), "double-threshold block written");
    Ok(count)
}

/// Generates every plan variant for one race
pub struct Pipeline<'a> {
    config: &'a AppConfig,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    /// Generate one variant into `race_folder`
    pub fn generate_variant(
        &self,
        race: &RaceData,
        plan: &PlanTemplate,
        variant: PlanVariant,
        race_folder: &Path,
    ) -> Result<VariantOutput> {
        let output = &self.config.output;
        let variant_dir = race_folder.join(variant.folder_name());

        let workouts = write_plan_workouts(
            race,
            plan,
            variant,
            &variant_dir,
            &output.author,
            output.overwrite,
        )?;

        let listing = generate_marketplace(race, plan, variant, &self.config.marketplace)?;
        let marketplace = variant_dir.join(LISTING_FILE);
        write_if_allowed(&marketplace, output.overwrite, || {
            fs::write(&marketplace, &listing.html).map_err(|e| {
                GravelKitError::from(OutputError::WriteFailed {
                    path: marketplace.clone(),
                    reason: e.to_string(),
                })
            })
        })?;

        let guide = write_guide(race, plan, variant, race_folder)?;

        Ok(VariantOutput {
            variant,
            workouts,
            marketplace,
            marketplace_chars: listing.char_count,
            guide,
        })
    }

    /// Generate all 15 variants for the race at `race_path`. A variant whose
    /// plan template is missing or broken is reported and skipped.
    pub fn generate_all(&self, race_path: &Path) -> Result<GenerationSummary> {
        let started = Instant::now();
        let race = RaceData::load(race_path)?;
        let race_folder = self.config.output.root_dir.join(race_folder_name(&race)?);
        fs::create_dir_all(&race_folder).map_err(|e| OutputError::CreateDir {
            path: race_folder.clone(),
            reason: e.to_string(),
        })?;

        let race_copy = race_folder.join(RACE_DATA_FILE);
        fs::copy(race_path, &race_copy).map_err(|e| OutputError::WriteFailed {
            path: race_copy.clone(),
            reason: e.to_string(),
        })?;

        let mut report = RunReport::new("generate");
        report.add_context("race", race.name());
        report.add_context("plans_dir", self.config.output.plans_dir.display().to_string());
        info!(race = %race.name(), folder = %race_folder.display(), "generating plans");

        let pb = self.progress_bar(PLAN_VARIANTS.len() as u64);
        let mut variants = Vec::new();
        let mut failed = Vec::new();

        for variant in PLAN_VARIANTS {
            pb.set_message(variant.folder_name());
            let template_path = self
                .config
                .output
                .plans_dir
                .join(variant.folder_name())
                .join(PLAN_TEMPLATE_FILE);

            let result = PlanTemplate::load(&template_path)
                .and_then(|plan| self.generate_variant(&race, &plan, variant, &race_folder));

            match result {
                Ok(output) => {
                    pb.println(format!(
                        "✓ {}: {} workouts, listing {} chars",
                        variant, output.workouts.written, output.marketplace_chars
                    ));
                    if output.marketplace_chars > self.config.marketplace.char_limit {
                        report.add_warning(format!(
                            "{}: listing is {} characters",
                            variant, output.marketplace_chars
                        ));
                    }
                    report.add_output(&output.marketplace);
                    report.add_output(&output.guide);
                    variants.push(output);
                }
                Err(err) => {
                    let message = err.user_message();
                    match err.severity() {
                        ErrorSeverity::Critical | ErrorSeverity::Error => {
                            error!(variant = %variant, "{}", err)
                        }
                        ErrorSeverity::Warning | ErrorSeverity::Info => {
                            warn!(variant = %variant, "{}", err)
                        }
                    }
                    pb.println(format!("✗ {}: {}", variant, message));
                    report.add_error(&err);
                    failed.push((variant, message));
                }
            }
            pb.inc(1);
        }
        pb.finish_with_message("done");

        report.set_success(failed.is_empty());
        report.set_duration(started.elapsed());

        let report_path = if self.config.output.write_report {
            let path = report.save_in(&race_folder).map_err(|e| OutputError::WriteFailed {
                path: race_folder.clone(),
                reason: e.to_string(),
            })?;
            Some(path)
        } else {
            None
        };

        let summary = GenerationSummary {
            race_folder,
            variants,
            failed,
            report: report_path,
        };
        info!(
            variants = summary.variants.len(),
            failed = summary.failed.len(),
            workouts = summary.total_workouts().written,
            "generation complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::{PlanLevel, Tier};
    use serde_json::json;

    fn race() -> RaceData {
        serde_json::from_value(json!({
            "race_metadata": {"name": "Unbound 200", "distance_miles": 200},
            "race_hooks": {"punchy": "Flint Hills chunk."}
        }))
        .unwrap()
    }

    fn plan() -> PlanTemplate {
        let mut plan: PlanTemplate = serde_json::from_value(json!({
            "plan_metadata": {"name": "Finisher Beginner"},
            "weeks": [
                {"week_number": 1, "workouts": [
                    {"name": "W01 Mon - Rest Day", "description": "Rest.", "blocks": "<FreeRide Duration=\"60\"/>"},
                    {"name": "W01 Tue - Tempo", "archetype": "tempo", "level": 2}
                ]},
                {"week_number": 2, "workouts_by_block": {
                    "A": [{"name": "W02 Sat - Long Ride", "description": "Long.", "blocks": "<SteadyState Duration=\"10800\" Power=\"0.65\"/>"}],
                    "B": [{"name": "W02 Sat - Long Ride", "description": "Long."}]
                }}
            ]
        }))
        .unwrap();
        plan.classify_untagged();
        plan
    }

    #[test]
    fn test_workout_blocks_fallbacks() {
        let archetype = Workout {
            name: "Tempo".into(),
            archetype: Some("tempo".into()),
            level: Some(1),
            ..Default::default()
        };
        assert!(workout_blocks(&archetype).unwrap().len() > 2);

        let unknown = Workout {
            name: "Mystery".into(),
            archetype: Some("nope".into()),
            ..Default::default()
        };
        let blocks = workout_blocks(&unknown).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].duration(), 60);
    }

    #[test]
    fn test_write_plan_workouts_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let variant = PlanVariant::find(Tier::Finisher, PlanLevel::Beginner).unwrap();
        let stats = write_plan_workouts(&race(), &plan(), variant, dir.path(), "Coach", true).unwrap();
        assert_eq!(stats, WriteStats { written: 4, skipped: 0 });

        let workouts = dir.path().join(WORKOUTS_DIR);
        assert!(workouts.join("W02_Sat_-_Long_Ride_A.zwo").exists());
        assert!(workouts.join("W02_Sat_-_Long_Ride_B.zwo").exists());

        let tempo = fs::read_to_string(workouts.join("W01_Tue_-_Tempo.zwo")).unwrap();
        let doc = ZwoDocument::parse(&tempo).unwrap();
        assert_eq!(doc.author, "Coach");
        assert!(doc.description.contains("MAIN SET:"));

        let again = write_plan_workouts(&race(), &plan(), variant, dir.path(), "Coach", false).unwrap();
        assert_eq!(again, WriteStats { written: 0, skipped: 4 });
    }

    #[test]
    fn test_race_folder_name() {
        let mut race = race();
        race.race_metadata.name = "Gravel / Grit".to_string();
        assert_eq!(race_folder_name(&race).unwrap(), "Gravel - Grit");

        for name in ["", "  ", ".", "..", " ... "] {
            race.race_metadata.name = name.to_string();
            assert!(race_folder_name(&race).is_err(), "{:?}", name);
        }
    }

    #[test]
    fn test_double_threshold_block_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(write_double_threshold_block(dir.path(), "Coach").unwrap(), 12);

        let week3 = dir.path().join("Week_3_Threshold_Accumulation_14x3min.zwo");
        let doc = ZwoDocument::parse(&fs::read_to_string(week3).unwrap()).unwrap();
        assert_eq!(doc.author, "Coach");
        assert_eq!(doc.blocks[2].attr_u32("Repeat"), Some(14));
        assert!(dir.path().join("Week_4_Threshold_Steady_2x15min.zwo").exists());
        assert!(dir.path().join("Week_1_Threshold_Progressive_2x20min.zwo").exists());
    }
}
