//! Category tag parsing for geography and industry metadata.
//!
//! Security metadata stores multi-valued categories as comma-separated text
//! (`"US, Europe, Asia"`). Scoring works on the parsed tag list so that a
//! position's value is split across every listed category instead of being
//! booked under one unsplit string.

/// Category used when a security carries no usable tag.
pub const OTHER_CATEGORY: &str = "OTHER";

/// Split comma-separated categories into an ordered tag list.
///
/// Whitespace around each tag is trimmed and empty entries are dropped, so
/// `" US,, Europe "` yields `["US", "Europe"]` and `""` yields `[]`.
pub fn parse_category_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distribute `value` equally across `tags`, calling `sink` once per tag.
///
/// An empty tag list books the whole value under [`OTHER_CATEGORY`].
pub fn fan_out<'a, F>(tags: &'a [String], value: f64, mut sink: F)
where
    F: FnMut(&'a str, f64),
{
    if tags.is_empty() {
        sink(OTHER_CATEGORY, value);
        return;
    }
    let share = value / tags.len() as f64;
    for tag in tags {
        sink(tag.as_str(), share);
    }
}

/// Serde adapter: accept either a comma-separated string or a list of tags.
pub(crate) mod serde_tags {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::parse_category_tags;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        List(Vec<String>),
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(tags: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error> {
        tags.join(", ").serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => parse_category_tags(&s),
            Raw::List(v) => v.iter().flat_map(|s| parse_category_tags(s)).collect(),
        })
    }
}
