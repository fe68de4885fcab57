use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// A leader's unique ability: short label plus zero or more discrete effect
/// descriptions in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ability {
    pub name: String,
    pub effects: Vec<String>,
}

/// One leader as extracted from a single edition's table row. Immutable once
/// built; `page_title` is the redirect-resolved canonical title used as the
/// cross-edition join key (empty for name-only rows without a page link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderEntity {
    pub name: String,
    pub page_title: String,
    pub url: String,
    pub attributes: Vec<String>,
    pub unique_ability: Ability,
}

/// Terminal output unit: a bilingual pair, or a single-sided record when the
/// leader exists on only one edition. Never both sides absent.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRecord {
    pub id: String,
    pub en: Option<LeaderEntity>,
    pub fr: Option<LeaderEntity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceRefs {
    pub en_list_page: String,
    pub fr_list_page: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetMeta {
    pub pulled_at: String,
    pub sources: SourceRefs,
}

/// Write-once output artifact.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub meta: DatasetMeta,
    pub leaders: Vec<MergedRecord>,
}

/// Current UTC time as ISO-8601 with `Z` suffix and no sub-second precision.
pub fn now_iso_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serialize the dataset and write it in a single operation, so an aborted
/// run never leaves a partial file behind.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(dataset).context("failed to serialize dataset JSON")?;
    fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
