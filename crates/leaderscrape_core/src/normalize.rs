/// Collapse all whitespace runs (including newlines and tabs) to single
/// spaces and trim the ends. Applied as the final step before any string is
/// stored or compared.
pub fn normalize_ws(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Derive a stable record id from a canonical page title.
/// `Ada_Lovelace_(Civ7)` becomes `ada_lovelace_civ7`.
pub fn slug(title: &str) -> String {
    let mut output = String::with_capacity(title.len());
    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            output.push(ch);
        } else if !output.ends_with('_') {
            output.push('_');
        }
    }
    output.trim_matches('_').to_string()
}
