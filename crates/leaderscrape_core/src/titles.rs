use percent_encoding::percent_decode_str;
use reqwest::Url;

/// Marker separating the wiki's content path from the page title, shared by
/// both editions (`/wiki/Title` and `/fr/wiki/Title`).
pub const CONTENT_PATH_MARKER: &str = "/wiki/";

/// Extract a page title from a page reference.
///
/// Accepts a full URL (`https://civilization.fandom.com/fr/wiki/Auguste_(Civ7)`)
/// or a raw string; returns the percent-decoded segment after the first
/// content-path marker, or `None` when the reference carries no recognizable
/// content path (bare identifiers fall in this bucket).
pub fn title_from_reference(reference: &str) -> Option<String> {
    let path = match Url::parse(reference) {
        Ok(url) => url.path().to_string(),
        Err(_) => reference.to_string(),
    };
    let (_, rest) = path.split_once(CONTENT_PATH_MARKER)?;
    if rest.is_empty() {
        return None;
    }
    Some(percent_decode_str(rest).decode_utf8_lossy().into_owned())
}
