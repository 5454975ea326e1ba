use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use gravelkit::archetype::{Archetype, Level};
use gravelkit::config::AppConfig;
use gravelkit::description::describe_fragment;
use gravelkit::guide::write_guide;
use gravelkit::landing::{self, LandingDocument};
use gravelkit::logging::{init_logging, LogLevel};
use gravelkit::marketplace::generate_marketplace;
use gravelkit::models::{PlanTemplate, RaceData};
use gravelkit::pipeline::{self, Pipeline, RACE_DATA_FILE};
use gravelkit::plans::{PlanLevel, PlanVariant, Tier};
use gravelkit::threshold_block::WEEKLY_LAYOUT;
use gravelkit::validate::{self, ValidationReport};

/// gravelkit - race-specific training plan content
///
/// Generates ZWO workouts, marketplace listings, training guides and landing
/// pages for gravel races, and validates the results.
#[derive(Parser)]
#[command(name = "gravelkit")]
#[command(author = "Gravel God Cycling")]
#[command(version)]
#[command(about = "Race-specific training plan content", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all 15 plan variants for a race
    Generate {
        /// Race data JSON
        #[arg(short, long)]
        race: PathBuf,

        /// Directory of `<variant folder>/template.json` plan templates
        #[arg(short, long)]
        plans_dir: Option<PathBuf>,

        /// Root directory for the race folder
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip files that already exist
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Write the ZWO files for one plan
    Zwo {
        #[arg(short, long, required_unless_present = "double_threshold")]
        race: Option<PathBuf>,

        /// Plan template JSON
        #[arg(short, long, required_unless_present = "double_threshold")]
        plan: Option<PathBuf>,

        #[arg(short, long)]
        output_dir: PathBuf,

        #[arg(short, long, default_value = "finisher")]
        tier: Tier,

        #[arg(short, long, default_value = "intermediate")]
        level: PlanLevel,

        /// Write the 4-week double-threshold block instead of a plan
        #[arg(long, conflicts_with_all = ["race", "plan"])]
        double_threshold: bool,
    },

    /// Write example ZWO files for every archetype and level
    Archetypes {
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Print the ZWO blocks for an archetype level
    Block {
        /// Archetype key, e.g. vo2_30_30
        #[arg(short, long)]
        archetype: String,

        /// Progression level, 1-6
        #[arg(short, long)]
        level: u8,
    },

    /// Print the structured description for a workout
    Describe {
        /// Workout name, used to detect the session type
        #[arg(short, long)]
        name: String,

        /// File holding the workout's ZWO block elements
        #[arg(short, long)]
        blocks: PathBuf,

        #[arg(short, long, default_value = "1")]
        level: u8,
    },

    /// Render one marketplace listing
    Marketplace {
        #[arg(short, long)]
        race: PathBuf,

        #[arg(short, long)]
        plan: PathBuf,

        #[arg(short, long)]
        tier: Tier,

        #[arg(short, long)]
        level: PlanLevel,

        /// Output HTML file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render one training guide
    Guide {
        #[arg(short, long)]
        race: PathBuf,

        #[arg(short, long)]
        plan: PathBuf,

        #[arg(short, long)]
        output_dir: PathBuf,

        #[arg(short, long)]
        tier: Tier,

        #[arg(short, long)]
        level: PlanLevel,
    },

    /// Render a race landing page
    Landing {
        /// Landing race data JSON (`{"race": {...}}`)
        #[arg(short, long)]
        race: PathBuf,

        /// Elementor export to splice the sections into
        #[arg(short, long)]
        base: Option<PathBuf>,

        /// Output file: Elementor JSON with --base, else an HTML preview
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate generated output and race data
    Validate {
        /// Race folder (or any directory) holding marketplace listings
        #[arg(long)]
        marketplace_dir: Option<PathBuf>,

        /// Race name spellings to count in listings
        #[arg(long = "race-name")]
        race_names: Vec<String>,

        /// Directory of .zwo files
        #[arg(long)]
        zwo_dir: Option<PathBuf>,

        /// Directory of guides
        #[arg(long)]
        guide_dir: Option<PathBuf>,

        /// Landing race data JSON
        #[arg(long)]
        race: Option<PathBuf>,

        /// Research notes (markdown) for the race data
        #[arg(long, requires = "race")]
        research: Option<PathBuf>,

        /// Elementor export to check for section widgets
        #[arg(long)]
        elementor: Option<PathBuf>,
    },

    /// Show or initialise the configuration file
    Config {
        /// Print the effective configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,
    },
}

fn load_race(path: &Path) -> Result<RaceData> {
    RaceData::load(path).with_context(|| format!("Failed to load race data: {}", path.display()))
}

fn load_plan(path: &Path) -> Result<PlanTemplate> {
    PlanTemplate::load(path).with_context(|| format!("Failed to load plan template: {}", path.display()))
}

/// Race names for listing checks: explicit names, else the race data copied
/// into the race folder
fn listing_race_names(dir: &Path, explicit: Vec<String>) -> Vec<String> {
    if !explicit.is_empty() {
        return explicit;
    }
    match RaceData::load(dir.join(RACE_DATA_FILE)) {
        Ok(race) => {
            let mut names = vec![race.name().to_string()];
            let marketplace = race.marketplace_name().to_string();
            if !names.contains(&marketplace) {
                names.push(marketplace);
            }
            names
        }
        Err(_) => {
            tracing::warn!(dir = %dir.display(), "no race names given; mention counts skipped");
            Vec::new()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    config.logging.level = LogLevel::from_verbosity(cli.verbose, config.logging.level);
    init_logging(&config.logging)?;

    if cli.verbose > 0 {
        eprintln!(
            "{}",
            format!("Log level: {}", config.logging.level.to_filter()).dimmed()
        );
    }

    match cli.command {
        Commands::Generate {
            race,
            plans_dir,
            output_dir,
            no_overwrite,
        } => {
            if let Some(dir) = plans_dir {
                config.output.plans_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output.root_dir = dir;
            }
            if no_overwrite {
                config.output.overwrite = false;
            }

            println!("{}", "Generating plan variants...".green().bold());
            let summary = Pipeline::new(&config)
                .generate_all(&race)
                .with_context(|| format!("Generation failed for {}", race.display()))?;

            let totals = summary.total_workouts();
            println!(
                "{}",
                format!(
                    "✓ {} variants, {} ZWO files written ({} skipped)",
                    summary.variants.len(),
                    totals.written,
                    totals.skipped
                )
                .green()
            );
            println!("  Output: {}", summary.race_folder.display());
            if let Some(report) = &summary.report {
                println!("  Report: {}", report.display());
            }
            if !summary.failed.is_empty() {
                for (variant, reason) in &summary.failed {
                    eprintln!("{}", format!("✗ {}: {}", variant, reason).red());
                }
                std::process::exit(1);
            }
        }

        Commands::Zwo {
            race,
            plan,
            output_dir,
            tier,
            level,
            double_threshold,
        } => {
            if double_threshold {
                let count =
                    pipeline::write_double_threshold_block(&output_dir, &config.output.author)?;
                println!(
                    "{}",
                    format!(
                        "✓ Wrote {} double-threshold workouts to {}",
                        count,
                        output_dir.display()
                    )
                    .green()
                );
                for (day, session) in WEEKLY_LAYOUT {
                    println!("  {:<10} {}", day, session);
                }
                return Ok(());
            }

            let race = load_race(&race.context("--race is required")?)?;
            let plan = load_plan(&plan.context("--plan is required")?)?;
            let variant = PlanVariant::find(tier, level)?;
            let stats = pipeline::write_plan_workouts(
                &race,
                &plan,
                variant,
                &output_dir,
                &config.output.author,
                config.output.overwrite,
            )?;
            println!(
                "{}",
                format!("✓ Wrote {} ZWO files for {}", stats.written, variant).green()
            );
        }

        Commands::Archetypes { output_dir } => {
            let count = pipeline::write_archetype_examples(&output_dir, &config.output.author)?;
            println!(
                "{}",
                format!("✓ Wrote {} archetype examples to {}", count, output_dir.display()).green()
            );
        }

        Commands::Block { archetype, level } => {
            let archetype: Archetype = archetype.parse()?;
            let level = Level::new(level)?;
            println!("{}", archetype.blocks(level));
        }

        Commands::Describe { name, blocks, level } => {
            let fragment = fs::read_to_string(&blocks)
                .with_context(|| format!("Failed to read blocks: {}", blocks.display()))?;
            println!("{}", describe_fragment(&name, &fragment, level)?);
        }

        Commands::Marketplace {
            race,
            plan,
            tier,
            level,
            output,
        } => {
            let race = load_race(&race)?;
            let plan = load_plan(&plan)?;
            let variant = PlanVariant::find(tier, level)?;
            let listing = generate_marketplace(&race, &plan, variant, &config.marketplace)?;
            match output {
                Some(path) => {
                    fs::write(&path, &listing.html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    let status = format!("✓ {} ({} characters)", path.display(), listing.char_count);
                    if listing.over_limit {
                        println!("{}", status.yellow());
                    } else {
                        println!("{}", status.green());
                    }
                }
                None => println!("{}", listing.html),
            }
        }

        Commands::Guide {
            race,
            plan,
            output_dir,
            tier,
            level,
        } => {
            let race = load_race(&race)?;
            let plan = load_plan(&plan)?;
            let variant = PlanVariant::find(tier, level)?;
            let path = write_guide(&race, &plan, variant, &output_dir)?;
            println!("{}", format!("✓ Guide written to {}", path.display()).green());
        }

        Commands::Landing { race, base, output } => {
            let doc = LandingDocument::load(&race)
                .with_context(|| format!("Failed to load landing data: {}", race.display()))?;
            let (path, missing) = landing::write_landing(&doc.race, base.as_deref(), &output)?;
            println!("{}", format!("✓ Landing page written to {}", path.display()).green());
            for section in missing {
                println!("{}", format!("  ! {} section not placed", section.label()).yellow());
            }
        }

        Commands::Validate {
            marketplace_dir,
            race_names,
            zwo_dir,
            guide_dir,
            race,
            research,
            elementor,
        } => {
            if marketplace_dir.is_none()
                && zwo_dir.is_none()
                && guide_dir.is_none()
                && race.is_none()
                && elementor.is_none()
            {
                bail!("Nothing to validate: pass at least one of --marketplace-dir, --zwo-dir, --guide-dir, --race, --elementor");
            }

            let mut report = ValidationReport::new();
            if let Some(dir) = marketplace_dir {
                let names = listing_race_names(&dir, race_names);
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                report.merge(validate::marketplace::validate_marketplace_dir(
                    &dir,
                    &names,
                    &config.validation,
                )?);
            }
            if let Some(dir) = zwo_dir {
                report.merge(validate::validate_zwo_dir(&dir)?);
            }
            if let Some(dir) = guide_dir {
                report.merge(validate::validate_guide_dir(&dir)?);
            }
            if let Some(path) = race {
                report.merge(validate::race_data::validate_race_file(&path, research.as_deref())?);
            }
            if let Some(path) = elementor {
                report.merge(validate::landing::validate_elementor_file(&path)?);
            }

            if !report.findings.is_empty() {
                println!("{}", report.summary_table());
            }
            let summary = format!(
                "{} checked: {} errors, {} warnings, {} info",
                report.checked,
                report.count(validate::Severity::Error),
                report.count(validate::Severity::Warning),
                report.count(validate::Severity::Info)
            );
            if report.has_errors() {
                println!("{}", format!("✗ {}", summary).red().bold());
            } else {
                println!("{}", format!("✓ {}", summary).green());
            }
            std::process::exit(report.exit_code());
        }

        Commands::Config { show, init } => {
            if init {
                let path = cli
                    .config
                    .clone()
                    .unwrap_or_else(AppConfig::default_config_path);
                if path.exists() {
                    bail!("Config file already exists: {}", path.display());
                }
                AppConfig::default().save_to_file(&path)?;
                println!("{}", format!("✓ Config written to {}", path.display()).green());
            }
            if show || !init {
                let toml = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
                println!("{}", toml);
            }
        }
    }

    Ok(())
}
