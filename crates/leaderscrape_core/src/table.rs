use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html};

use crate::dom::{HEADER_CELL, ROW, TABLE, direct_cells, element_text};

/// Find the first table whose header-cell text set is a superset of the
/// required labels. Wiki pages carry many unrelated tables (navigation,
/// infoboxes); the header set is the only stable discriminator since table
/// position and styling vary between editions.
pub fn find_table_by_headers<'a>(
    document: &'a Html,
    required_headers: &HashSet<&str>,
) -> Option<ElementRef<'a>> {
    document.select(&TABLE).find(|table| {
        let headers: HashSet<String> = table.select(&HEADER_CELL).map(element_text).collect();
        required_headers
            .iter()
            .all(|required| headers.contains(*required))
    })
}

/// Map each non-empty header label to its zero-based column position among
/// the direct child cells of the first row containing a header cell. Banner
/// and caption rows may precede the header row; a table with no header row
/// yields an empty map.
pub fn header_index_map(table: ElementRef<'_>) -> HashMap<String, usize> {
    let Some(header_row) = table
        .select(&ROW)
        .find(|row| row.select(&HEADER_CELL).next().is_some())
    else {
        return HashMap::new();
    };

    let mut index = HashMap::new();
    for (position, cell) in direct_cells(header_row).into_iter().enumerate() {
        let label = element_text(cell);
        if !label.is_empty() {
            index.insert(label, position);
        }
    }
    index
}
