//! Thin adapter over the HTML document tree: shared selectors and the text
//! extraction conventions used by the table pipeline.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Selector};

use crate::normalize::normalize_ws;

pub static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
pub static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
pub static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th"));
pub static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
pub static LINKED_ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
pub static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));
pub static EMPHASIS: LazyLock<Selector> = LazyLock::new(|| selector("b, strong"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Full text of an element: text nodes joined by single spaces, normalized.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text nodes of an element as normalized non-empty lines, in document order.
pub fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(normalize_ws)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Direct child cells (`th`/`td`) of a table row, excluding cells of any
/// nested structure.
pub fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| matches!(child.value().name(), "th" | "td"))
        .collect()
}

/// Resolve an href against an edition base URL. Falls back to the raw href
/// when the base does not parse, which keeps the function total.
pub fn absolutize(base_url: &str, href: &str) -> String {
    let rooted = format!("{}/", base_url.trim_end_matches('/'));
    match Url::parse(&rooted).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}
