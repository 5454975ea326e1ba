//! gravelkit: race-specific training content for gravel cycling plans
//!
//! From one race record and a set of plan templates this crate produces ZWO
//! workouts, marketplace listings, training guides and landing pages, and
//! validates what it produced.

pub mod archetype;
pub mod config;
pub mod copy;
pub mod description;
pub mod enrichment;
pub mod error;
pub mod guide;
pub mod landing;
pub mod logging;
pub mod marketplace;
pub mod models;
pub mod pipeline;
pub mod plans;
pub mod template;
pub mod threshold_block;
pub mod validate;
pub mod zwo;

// Re-export commonly used types for convenience
pub use archetype::{generate_blocks, Archetype, Level};
pub use config::AppConfig;
pub use description::{describe_fragment, DescriptionRequest, SessionPattern};
pub use enrichment::Enricher;
pub use error::{GravelKitError, Result};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, RunReport};
pub use marketplace::{generate_marketplace, MarketplaceListing};
pub use models::{PlanTemplate, RaceData, Workout, WorkoutTag};
pub use pipeline::{GenerationSummary, Pipeline};
pub use plans::{PlanLevel, PlanVariant, Tier, PLAN_VARIANTS};
pub use threshold_block::{BlockWorkout, ThresholdSession};
pub use validate::{Finding, Severity, ValidationReport};
pub use zwo::{Block, BlockKind, ZwoDocument};
