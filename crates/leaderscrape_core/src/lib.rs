//! Bilingual Civilization VII leader dataset builder.
//!
//! Fetches the leader list pages of the English and French wiki editions,
//! extracts one entity per table row, reconciles the two editions through
//! canonical titles and inter-language links, and assembles a single merged
//! JSON dataset.

pub mod client;
pub mod dom;
pub mod edition;
pub mod extract;
pub mod link;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod scrape;
pub mod table;
pub mod titles;

pub use client::WikiClient;
pub use model::{Ability, Dataset, LeaderEntity, MergedRecord, write_dataset};
pub use scrape::build_dataset;
