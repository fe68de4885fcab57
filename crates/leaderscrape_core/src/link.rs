use std::collections::{HashMap, HashSet};

use anyhow::Result;
use log::debug;

/// Map each secondary-edition canonical title to its primary-edition
/// counterpart.
///
/// Same-titled pages across editions are common, so a verbatim title match
/// links directly without touching the lookup. Otherwise `lookup` runs the
/// inter-language query (and canonicalizes its result against the primary
/// edition before returning). A `None` from the lookup leaves the title
/// unlinked; that is a normal outcome, not an error.
pub fn link_editions<F>(
    secondary_titles: &[String],
    primary_titles: &HashSet<String>,
    mut lookup: F,
) -> Result<HashMap<String, String>>
where
    F: FnMut(&str) -> Result<Option<String>>,
{
    let mut links = HashMap::new();
    for title in secondary_titles {
        if primary_titles.contains(title) {
            debug!("direct title match: {title}");
            links.insert(title.clone(), title.clone());
            continue;
        }
        match lookup(title)? {
            Some(target) => {
                debug!("inter-language link: {title} -> {target}");
                links.insert(title.clone(), target);
            }
            None => debug!("no inter-language link for {title}"),
        }
    }
    Ok(links)
}
