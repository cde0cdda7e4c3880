//! # morwiki
//!
//! Return to Moria wiki data library - table loading, cross-table name
//! resolution, and recipe joining.
//!
//! This library provides functionality to:
//! - Load exported data tables and merge string tables into one catalog
//! - Resolve internal row names to display names through layered fallbacks
//! - Join entities to their crafting recipes across naming conventions
//! - Classify DLC ownership and building-set membership
//! - Deduplicate display-name collisions into one canonical entity set
//! - Build the reverse material-usage index for "used in" listings
//!
//! ## Example
//!
//! ```no_run
//! use morwiki::{pipeline, Category, GameData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = pipeline::PipelineConfig::new("export/Data");
//! config.categories = vec![Category::Constructions, Category::Items];
//!
//! let output = pipeline::run(&config, GameData::standard())?;
//! for result in &output.categories {
//!     println!("{}: {} entities", result.category, result.entities.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod entity;
pub mod gamedata;
pub mod names;
pub mod pipeline;
pub mod property;
pub mod provenance;
pub mod recipe;
pub mod resolve;
pub mod strings;
pub mod tables;
pub mod usage;

// Re-export commonly used items
#[doc(inline)]
pub use entity::{Category, CategoryExtras, Entity, Exclusion, ExclusionReason, ResolvedRecipe};
#[doc(inline)]
pub use gamedata::GameData;
#[doc(inline)]
pub use pipeline::{PipelineConfig, RunOutput};
#[doc(inline)]
pub use property::RawRecord;
#[doc(inline)]
pub use recipe::{RecipeIndex, RecipeRecord, UnlockKind, UnlockSpec};
#[doc(inline)]
pub use strings::StringCatalog;
#[doc(inline)]
pub use tables::{LoadError, TableDocument};
#[doc(inline)]
pub use usage::UsageIndex;
