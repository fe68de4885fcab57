use std::collections::HashSet;

use anyhow::{Result, anyhow};
use log::info;
use scraper::Html;

use crate::client::WikiClient;
use crate::edition::{Edition, EditionProfile};
use crate::extract::{RawLeader, extract_rows};
use crate::link::link_editions;
use crate::merge::assemble_records;
use crate::model::{Dataset, DatasetMeta, LeaderEntity, SourceRefs, now_iso_utc};
use crate::table::{find_table_by_headers, header_index_map};
use crate::titles::title_from_reference;

/// Fetch one edition's list page and turn its leaders table into entities
/// with redirect-resolved canonical titles.
pub fn scrape_edition(client: &WikiClient, profile: &EditionProfile) -> Result<Vec<LeaderEntity>> {
    info!(
        "fetching {} leader list from {}",
        profile.language,
        profile.list_page_url()
    );
    let html = client.page_html(profile, profile.list_page)?;
    let document = Html::parse_document(&html);

    let required = profile.required_headers();
    let table = find_table_by_headers(&document, &required).ok_or_else(|| {
        let mut labels: Vec<&str> = required.iter().copied().collect();
        labels.sort_unstable();
        anyhow!(
            "cannot find leaders table on {} with headers {labels:?}",
            profile.list_page_url()
        )
    })?;
    let columns = header_index_map(table);
    let rows = extract_rows(table, &columns, profile)?;
    info!("{}: {} table rows extracted", profile.language, rows.len());

    let mut leaders = Vec::with_capacity(rows.len());
    for row in rows {
        leaders.push(resolve_entity(client, profile, row)?);
    }
    Ok(leaders)
}

fn resolve_entity(
    client: &WikiClient,
    profile: &EditionProfile,
    row: RawLeader,
) -> Result<LeaderEntity> {
    let (page_title, url) = match title_from_reference(&row.url) {
        Some(raw_title) => {
            let (canonical, canonical_url) = client.canonical_title(profile, &raw_title)?;
            (canonical, canonical_url.unwrap_or(row.url))
        }
        // Name-only row: nothing to canonicalize, no join key.
        None => (String::new(), row.url),
    };

    Ok(LeaderEntity {
        name: row.name,
        page_title,
        url,
        attributes: row.attributes,
        unique_ability: row.ability,
    })
}

/// Run the whole pipeline: both editions, cross-language linking, merge,
/// stamped dataset.
pub fn build_dataset(client: &WikiClient) -> Result<Dataset> {
    let en_profile = Edition::En.profile();
    let fr_profile = Edition::Fr.profile();

    let en = scrape_edition(client, en_profile)?;
    let fr = scrape_edition(client, fr_profile)?;

    let en_titles: HashSet<String> = en
        .iter()
        .filter(|entity| !entity.page_title.is_empty())
        .map(|entity| entity.page_title.clone())
        .collect();
    let fr_titles: Vec<String> = fr
        .iter()
        .filter(|entity| !entity.page_title.is_empty())
        .map(|entity| entity.page_title.clone())
        .collect();

    let links = link_editions(&fr_titles, &en_titles, |title| {
        match client.langlink_target(fr_profile, en_profile, title)? {
            // The link metadata may itself point at a redirect; resolve it
            // against the English edition before using it as a join key.
            Some(target) => {
                let (canonical, _) = client.canonical_title(en_profile, &target)?;
                Ok(Some(canonical))
            }
            None => Ok(None),
        }
    })?;
    info!("linked {} of {} french leaders", links.len(), fr_titles.len());

    let (records, consumed) = assemble_records(&en, &fr, &links);
    info!(
        "assembled {} records ({} english titles consumed)",
        records.len(),
        consumed.len()
    );

    Ok(Dataset {
        meta: DatasetMeta {
            pulled_at: now_iso_utc(),
            sources: SourceRefs {
                en_list_page: en_profile.list_page_url(),
                fr_list_page: fr_profile.list_page_url(),
            },
        },
        leaders: records,
    })
}
