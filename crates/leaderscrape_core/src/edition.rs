use std::collections::HashSet;

use crate::titles::CONTENT_PATH_MARKER;

/// One language edition of the wiki. English is the primary edition and the
/// merge side every secondary entity tries to link against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edition {
    En,
    Fr,
}

/// Closed per-edition configuration: list-page location, the header labels
/// that identify the leaders table, and the attribute vocabulary. Adding a
/// language means adding one profile here and nowhere else.
#[derive(Debug)]
pub struct EditionProfile {
    pub edition: Edition,
    pub language: &'static str,
    pub base_url: &'static str,
    pub list_page: &'static str,
    pub leader_header: &'static str,
    pub ability_header: &'static str,
    pub attributes_header: &'static str,
    pub attribute_vocabulary: &'static [&'static str],
}

static EN_PROFILE: EditionProfile = EditionProfile {
    edition: Edition::En,
    language: "en",
    base_url: "https://civilization.fandom.com",
    list_page: "Leaders_(Civ7)",
    leader_header: "Leader",
    ability_header: "Unique ability",
    attributes_header: "Attributes",
    attribute_vocabulary: &[
        "Cultural",
        "Diplomatic",
        "Economic",
        "Expansionist",
        "Militaristic",
        "Scientific",
    ],
};

// The wiki uses both accented and accent-less spellings of the economic
// attribute on the French edition.
static FR_PROFILE: EditionProfile = EditionProfile {
    edition: Edition::Fr,
    language: "fr",
    base_url: "https://civilization.fandom.com/fr",
    list_page: "Dirigeants_(Civ7)",
    leader_header: "Dirigeant",
    ability_header: "Compétence exclusive",
    attributes_header: "Attribut",
    attribute_vocabulary: &[
        "Culturel",
        "Diplomatique",
        "Économique",
        "Economique",
        "Expansionniste",
        "Militariste",
        "Scientifique",
    ],
};

impl Edition {
    pub fn profile(self) -> &'static EditionProfile {
        match self {
            Edition::En => &EN_PROFILE,
            Edition::Fr => &FR_PROFILE,
        }
    }
}

impl EditionProfile {
    /// Header labels the leaders table must carry, in no particular order.
    pub fn required_headers(&self) -> HashSet<&'static str> {
        HashSet::from([self.leader_header, self.ability_header, self.attributes_header])
    }

    pub fn api_url(&self) -> String {
        format!("{}/api.php", self.base_url.trim_end_matches('/'))
    }

    pub fn list_page_url(&self) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            CONTENT_PATH_MARKER,
            self.list_page
        )
    }

    pub fn recognizes_attribute(&self, label: &str) -> bool {
        self.attribute_vocabulary.contains(&label)
    }
}
