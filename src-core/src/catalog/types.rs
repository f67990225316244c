use serde::{Deserialize, Serialize};

/// Category value that means "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Highest relevance score an activity can carry.
pub const MAX_RELEVANCE: u32 = 10;

/// A travel activity as served by the catalog API.
/// Only `id`, `name`, `category`, `relevance_score`, `description` and
/// `location` take part in filtering; the rest is descriptive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub category: String,
    /// 0-10 inclusive.
    pub relevance_score: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Reviews>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Reviews {
    pub average: f32,
    pub count: u32,
}

/// The active catalog query.
///
/// A spec is a value: the `with_*` methods consume it and return a new one,
/// so a change in the filter UI always produces a fresh spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_relevance: u32,
    #[serde(default)]
    pub search_text: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..self
        }
    }

    pub fn with_min_relevance(self, min_relevance: u32) -> Self {
        Self {
            min_relevance,
            ..self
        }
    }

    pub fn with_search_text(self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: Some(search_text.into()),
            ..self
        }
    }

    /// The category to filter on, or None when every category matches.
    pub fn effective_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// The trimmed search text, or None when it is absent or blank.
    pub fn effective_search_text(&self) -> Option<&str> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// True when any filter narrows the catalog.
    pub fn is_active(&self) -> bool {
        self.effective_category().is_some()
            || self.min_relevance > 0
            || self.effective_search_text().is_some()
    }

    /// Spec with every filter removed.
    pub fn cleared(&self) -> Self {
        Self::default()
    }
}
