//! Query-string form of a [`FilterSpec`], so a filtered view can be
//! bookmarked and shared.
//!
//! Keys: `category`, `minRelevance`, `search`. Each key is omitted when its
//! filter is inactive. Parsing never fails: malformed values fall back to
//! "no filter".

use url::form_urlencoded;

use super::types::{FilterSpec, ALL_CATEGORIES};

pub const CATEGORY_KEY: &str = "category";
pub const MIN_RELEVANCE_KEY: &str = "minRelevance";
pub const SEARCH_KEY: &str = "search";

/// Path of the browse page.
pub const ACTIVITIES_PATH: &str = "/activities";

/// Encode the active filters, without a leading `?`.
pub fn to_query_string(spec: &FilterSpec) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(category) = spec.effective_category() {
        serializer.append_pair(CATEGORY_KEY, category);
    }
    if spec.min_relevance > 0 {
        serializer.append_pair(MIN_RELEVANCE_KEY, &spec.min_relevance.to_string());
    }
    if let Some(search) = spec.effective_search_text() {
        serializer.append_pair(SEARCH_KEY, search);
    }
    serializer.finish()
}

/// Decode a query string (with or without leading `?`).
pub fn from_query_string(query: &str) -> FilterSpec {
    let query = query.strip_prefix('?').unwrap_or(query);
    from_pairs(form_urlencoded::parse(query.as_bytes()).into_owned())
}

/// Build a spec from decoded key/value pairs. Later duplicates win; unknown
/// keys are ignored.
pub fn from_pairs<I, K, V>(pairs: I) -> FilterSpec
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut spec = FilterSpec::default();
    for (key, value) in pairs {
        let value = value.as_ref();
        match key.as_ref() {
            CATEGORY_KEY => {
                spec.category = Some(value.to_string())
                    .filter(|c| !c.is_empty() && c != ALL_CATEGORIES);
            }
            MIN_RELEVANCE_KEY => spec.min_relevance = parse_min_relevance(value),
            SEARCH_KEY => {
                spec.search_text = Some(value.to_string()).filter(|s| !s.trim().is_empty());
            }
            _ => {}
        }
    }
    spec
}

/// Non-negative integer, or 0 for anything else.
pub fn parse_min_relevance(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0)
}

/// `/activities` plus the encoded filters, if any.
pub fn activities_path(spec: &FilterSpec) -> String {
    let query = to_query_string(spec);
    if query.is_empty() {
        ACTIVITIES_PATH.to_string()
    } else {
        format!("{}?{}", ACTIVITIES_PATH, query)
    }
}
