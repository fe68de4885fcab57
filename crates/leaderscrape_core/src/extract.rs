use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow};
use scraper::ElementRef;

use crate::dom::{
    ANCHOR, EMPHASIS, HEADER_CELL, LINKED_ANCHOR, LIST_ITEM, ROW, absolutize, direct_cells,
    element_text, text_lines,
};
use crate::edition::EditionProfile;
use crate::model::Ability;
use crate::titles::CONTENT_PATH_MARKER;

/// One table row before canonicalization: display name, absolute page URL
/// (empty for name-only rows), recognized attribute labels, parsed ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLeader {
    pub name: String,
    pub url: String,
    pub attributes: Vec<String>,
    pub ability: Ability,
}

/// Walk every data row of the located leaders table and produce one raw
/// entity per usable row. Decorative, spanning, and header-repeat rows are
/// skipped silently; rows whose name normalizes to empty are dropped.
pub fn extract_rows(
    table: ElementRef<'_>,
    columns: &HashMap<String, usize>,
    profile: &EditionProfile,
) -> Result<Vec<RawLeader>> {
    let leader_col = resolve_column(columns, profile.leader_header)?;
    let ability_col = resolve_column(columns, profile.ability_header)?;
    let attributes_col = resolve_column(columns, profile.attributes_header)?;
    let max_col = leader_col.max(ability_col).max(attributes_col);

    // Labels that mark a header row: the required set plus any extra
    // columns the header row carries.
    let header_labels: HashSet<&str> = profile
        .required_headers()
        .into_iter()
        .chain(columns.keys().map(String::as_str))
        .collect();

    let mut leaders = Vec::new();
    for row in table.select(&ROW) {
        let cells = direct_cells(row);
        if cells.len() <= max_col {
            continue;
        }
        if is_header_repeat(row, &cells, &header_labels) {
            continue;
        }

        let (name, url) = pick_leader_link(cells[leader_col], profile.base_url);
        if name.is_empty() {
            continue;
        }

        leaders.push(RawLeader {
            name,
            url,
            attributes: extract_attributes(cells[attributes_col], profile),
            ability: parse_ability_cell(cells[ability_col]),
        });
    }
    Ok(leaders)
}

fn resolve_column(columns: &HashMap<String, usize>, label: &str) -> Result<usize> {
    columns
        .get(label)
        .copied()
        .ok_or_else(|| anyhow!("header row has no '{label}' column"))
}

/// A repeated header row: contains a header cell and every direct child cell
/// reads as one of the table's header labels.
fn is_header_repeat(
    row: ElementRef<'_>,
    cells: &[ElementRef<'_>],
    header_labels: &HashSet<&str>,
) -> bool {
    row.select(&HEADER_CELL).next().is_some()
        && cells
            .iter()
            .all(|cell| header_labels.contains(element_text(*cell).as_str()))
}

/// First link in document order whose target carries the content-path marker
/// and whose anchor text is non-empty; the cell usually leads with an image
/// link that fails the text check. Falls back to the cell's full text with an
/// empty URL (name-only entity).
fn pick_leader_link(cell: ElementRef<'_>, base_url: &str) -> (String, String) {
    let linked = cell.select(&LINKED_ANCHOR).find_map(|anchor| {
        let href = anchor.value().attr("href")?;
        if !href.contains(CONTENT_PATH_MARKER) {
            return None;
        }
        let name = element_text(anchor);
        if name.is_empty() {
            return None;
        }
        Some((name, absolutize(base_url, href)))
    });
    linked.unwrap_or_else(|| (element_text(cell), String::new()))
}

/// Text of every link in the cell, filtered against the edition's closed
/// attribute vocabulary, deduplicated in first-occurrence order.
fn extract_attributes(cell: ElementRef<'_>, profile: &EditionProfile) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut attributes = Vec::new();
    for anchor in cell.select(&ANCHOR) {
        let label = element_text(anchor);
        if profile.recognizes_attribute(&label) && seen.insert(label.clone()) {
            attributes.push(label);
        }
    }
    attributes
}

/// Split an ability cell into a short name and discrete effects.
///
/// Name: first `b`/`strong` element, else the first non-empty text line.
/// Effects: list items in document order when present; otherwise the full
/// cell text minus a leading occurrence of the name. The prefix strip is
/// case-insensitive over the name's character length and can over-strip when
/// the name happens to prefix unrelated text; that behavior is kept as
/// observed on the source pages.
pub fn parse_ability_cell(cell: ElementRef<'_>) -> Ability {
    let name = match cell.select(&EMPHASIS).next() {
        Some(emphasis) => element_text(emphasis),
        None => text_lines(cell).into_iter().next().unwrap_or_default(),
    };

    let items: Vec<String> = cell
        .select(&LIST_ITEM)
        .map(element_text)
        .filter(|item| !item.is_empty())
        .collect();

    let effects = if !items.is_empty() {
        items
    } else {
        let full = element_text(cell);
        let rest = if !name.is_empty()
            && full.to_lowercase().starts_with(&name.to_lowercase())
        {
            full.chars()
                .skip(name.chars().count())
                .collect::<String>()
                .trim_start_matches([' ', ':', '-', '–', '—'])
                .to_string()
        } else {
            full
        };
        if !rest.is_empty() && rest != name {
            vec![rest]
        } else {
            Vec::new()
        }
    };

    Ability { name, effects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::TABLE;
    use crate::edition::Edition;
    use crate::table::{find_table_by_headers, header_index_map};
    use scraper::Html;

    fn ability_from(cell_html: &str) -> Ability {
        let html = format!("<table><tr><td id=\"cell\">{cell_html}</td></tr></table>");
        let document = Html::parse_fragment(&html);
        let table = document.select(&TABLE).next().expect("table");
        let cell = table
            .select(&ROW)
            .next()
            .map(direct_cells)
            .and_then(|cells| cells.into_iter().next())
            .expect("cell");
        parse_ability_cell(cell)
    }

    fn en_rows(table_html: &str) -> Vec<RawLeader> {
        let profile = Edition::En.profile();
        let document = Html::parse_fragment(table_html);
        let table =
            find_table_by_headers(&document, &profile.required_headers()).expect("leaders table");
        let columns = header_index_map(table);
        extract_rows(table, &columns, profile).expect("rows")
    }

    const EN_TABLE: &str = "<table>\
        <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th></tr>\
        <tr>\
          <td><a href=\"/wiki/Ada_Lovelace_(Civ7)\"><img src=\"ada.png\"></a>\
              <a href=\"/wiki/Ada_Lovelace_(Civ7)\">Ada Lovelace</a></td>\
          <td><a href=\"/wiki/Scientific\">Scientific</a>\
              <a href=\"/wiki/Scientific\">Scientific</a>\
              <a href=\"/wiki/Eureka\">Eureka</a></td>\
          <td><b>Analytical Engine</b><ul><li>+1 Science per specialist</li>\
              <li>Unlocks unique quarter</li></ul></td>\
        </tr>\
        </table>";

    #[test]
    fn extracts_one_entity_per_data_row() {
        let rows = en_rows(EN_TABLE);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Ada Lovelace");
        assert_eq!(
            row.url,
            "https://civilization.fandom.com/wiki/Ada_Lovelace_(Civ7)"
        );
        assert_eq!(row.attributes, vec!["Scientific".to_string()]);
        assert_eq!(row.ability.name, "Analytical Engine");
        assert_eq!(row.ability.effects.len(), 2);
    }

    #[test]
    fn leader_link_skips_image_only_anchors() {
        let rows = en_rows(EN_TABLE);
        // The first anchor wraps an image and has no text; the second wins.
        assert_eq!(rows[0].name, "Ada Lovelace");
    }

    #[test]
    fn attribute_filter_respects_vocabulary_and_order() {
        let html = "<table>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th></tr>\
            <tr>\
              <td><a href=\"/wiki/Ada_Lovelace_(Civ7)\">Ada Lovelace</a></td>\
              <td><a>Militaristic</a><a>Unknown badge</a><a>Cultural</a>\
                  <a>Militaristic</a></td>\
              <td><b>Ability</b></td>\
            </tr></table>";
        let rows = en_rows(html);
        assert_eq!(
            rows[0].attributes,
            vec!["Militaristic".to_string(), "Cultural".to_string()]
        );
    }

    #[test]
    fn rows_shorter_than_referenced_columns_are_skipped() {
        let html = "<table>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th></tr>\
            <tr><td colspan=\"3\">Spanning decorative row</td></tr>\
            <tr>\
              <td><a href=\"/wiki/Ada_Lovelace_(Civ7)\">Ada Lovelace</a></td>\
              <td></td><td><b>Ability</b></td>\
            </tr></table>";
        let rows = en_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ada Lovelace");
    }

    #[test]
    fn repeated_header_rows_are_skipped() {
        let html = "<table>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th></tr>\
            <tr>\
              <td><a href=\"/wiki/Ada_Lovelace_(Civ7)\">Ada Lovelace</a></td>\
              <td></td><td><b>Ability</b></td>\
            </tr>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th></tr>\
            </table>";
        let rows = en_rows(html);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn header_rows_with_extra_columns_never_become_entities() {
        let html = "<table>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th><th>Notes</th></tr>\
            <tr>\
              <td><a href=\"/wiki/Ada_Lovelace_(Civ7)\">Ada Lovelace</a></td>\
              <td></td><td><b>Ability</b></td><td>launch leader</td>\
            </tr>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th><th>Notes</th></tr>\
            </table>";
        let rows = en_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ada Lovelace");
    }

    #[test]
    fn rows_without_page_link_become_name_only_entities() {
        let html = "<table>\
            <tr><th>Leader</th><th>Attributes</th><th>Unique ability</th></tr>\
            <tr>\
              <td>Unannounced leader</td>\
              <td></td><td>TBA</td>\
            </tr></table>";
        let rows = en_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Unannounced leader");
        assert!(rows[0].url.is_empty());
    }

    #[test]
    fn missing_required_column_in_header_row_is_an_error() {
        let profile = Edition::En.profile();
        let document = Html::parse_fragment(EN_TABLE);
        let table =
            find_table_by_headers(&document, &profile.required_headers()).expect("leaders table");
        let mut columns = header_index_map(table);
        columns.remove("Leader");
        let error = extract_rows(table, &columns, profile).expect_err("must fail");
        assert!(error.to_string().contains("'Leader'"));
    }

    #[test]
    fn ability_split_with_bold_name_and_list_items() {
        let ability =
            ability_from("<b>Trade Legacy</b><ul><li>+2 Gold per trade route</li><li>Unlocks caravan</li></ul>");
        assert_eq!(ability.name, "Trade Legacy");
        assert_eq!(
            ability.effects,
            vec!["+2 Gold per trade route".to_string(), "Unlocks caravan".to_string()]
        );
    }

    #[test]
    fn ability_name_falls_back_to_first_line() {
        let ability = ability_from("Imperium Maius<br>All towns gain +1 Culture");
        assert_eq!(ability.name, "Imperium Maius");
        assert_eq!(ability.effects, vec!["All towns gain +1 Culture".to_string()]);
    }

    #[test]
    fn ability_effect_strips_leading_name_and_punctuation() {
        let ability = ability_from("<b>Trade Legacy</b>: +2 Gold per trade route");
        assert_eq!(ability.name, "Trade Legacy");
        assert_eq!(ability.effects, vec!["+2 Gold per trade route".to_string()]);
    }

    #[test]
    fn ability_prefix_strip_matches_case_insensitively() {
        // The leading text repeats the bold name in a different case; after
        // the strip the remainder equals the name and is discarded.
        let ability = ability_from("<i>TRADE LEGACY</i> <b>Trade Legacy</b>");
        assert_eq!(ability.name, "Trade Legacy");
        assert!(ability.effects.is_empty());
    }

    #[test]
    fn ability_with_name_only_has_no_effects() {
        let ability = ability_from("<b>Trade Legacy</b>");
        assert_eq!(ability.name, "Trade Legacy");
        assert!(ability.effects.is_empty());
    }

    #[test]
    fn empty_ability_cell_yields_empty_name_and_effects() {
        let ability = ability_from("  ");
        assert!(ability.name.is_empty());
        assert!(ability.effects.is_empty());
    }
}
