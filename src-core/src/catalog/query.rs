//! Catalog query engine: filtering, relevance sorting and category listing.
//!
//! Every function here is pure. The catalog is borrowed immutably and the
//! results borrow from it, so the same inputs always give the same output.

use std::collections::HashSet;

use super::types::{Activity, FilterSpec, ALL_CATEGORIES};

/// Featured views show this many activities unless the caller asks otherwise.
pub const DEFAULT_FEATURED_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep catalog order.
    #[default]
    Catalog,
    /// Highest relevance first; equal scores keep catalog order.
    RelevanceDesc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub sort: SortOrder,
    pub limit: Option<usize>,
}

impl QueryOptions {
    /// Relevance-descending, truncated to `limit`.
    pub fn featured(limit: usize) -> Self {
        Self {
            sort: SortOrder::RelevanceDesc,
            limit: Some(limit),
        }
    }
}

/// Activities matching `spec`, in catalog order.
pub fn query<'a>(catalog: &'a [Activity], spec: &FilterSpec) -> Vec<&'a Activity> {
    query_with(catalog, spec, QueryOptions::default())
}

/// Activities matching `spec`, ordered and truncated per `options`.
pub fn query_with<'a>(
    catalog: &'a [Activity],
    spec: &FilterSpec,
    options: QueryOptions,
) -> Vec<&'a Activity> {
    let search = spec.effective_search_text().map(str::to_lowercase);

    let mut results: Vec<&Activity> = catalog
        .iter()
        .filter(|a| matches(a, spec, search.as_deref()))
        .collect();

    if options.sort == SortOrder::RelevanceDesc {
        // sort_by is stable, so ties keep catalog order
        results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    }

    if let Some(limit) = options.limit {
        results.truncate(limit);
    }

    results
}

/// The `limit` most relevant activities of the whole catalog.
pub fn featured(catalog: &[Activity], limit: usize) -> Vec<&Activity> {
    query_with(catalog, &FilterSpec::default(), QueryOptions::featured(limit))
}

pub fn find_by_id<'a>(catalog: &'a [Activity], id: &str) -> Option<&'a Activity> {
    catalog.iter().find(|a| a.id == id)
}

/// "All Categories" followed by each distinct category in first-seen order.
pub fn categories(catalog: &[Activity]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = vec![ALL_CATEGORIES.to_string()];
    for activity in catalog {
        if seen.insert(activity.category.as_str()) {
            result.push(activity.category.clone());
        }
    }
    result
}

/// `search_lower` must already be trimmed and lowercased.
fn matches(activity: &Activity, spec: &FilterSpec, search_lower: Option<&str>) -> bool {
    if let Some(category) = spec.effective_category() {
        if activity.category != category {
            return false;
        }
    }

    if activity.relevance_score < spec.min_relevance {
        return false;
    }

    match search_lower {
        Some(needle) => [
            &activity.name,
            &activity.description,
            &activity.location,
            &activity.category,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, name: &str, category: &str, score: u32) -> Activity {
        Activity {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            relevance_score: score,
            description: format!("{} description", name),
            location: "Somewhere".to_string(),
            image: None,
            price: None,
            duration: None,
            group_size: None,
            languages: vec![],
            included: vec![],
            reviews: None,
        }
    }

    fn sample_catalog() -> Vec<Activity> {
        let mut hiking = activity("1", "Guided Mountain Hiking Tour", "Outdoor Adventure", 9);
        hiking.location = "Swiss Alps".to_string();
        let mut sailing = activity("3", "Sunset Sailing Experience", "Water Activities", 7);
        sailing.location = "Santorini, Greece".to_string();
        vec![hiking, sailing]
    }

    fn ids(results: &[&Activity]) -> Vec<String> {
        results.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_min_relevance_filter() {
        let catalog = sample_catalog();
        let results = query(&catalog, &FilterSpec::new().with_min_relevance(8));
        assert_eq!(ids(&results), vec!["1"]);
    }

    #[test]
    fn test_search_text_filter() {
        let catalog = sample_catalog();
        let results = query(&catalog, &FilterSpec::new().with_search_text("sailing"));
        assert_eq!(ids(&results), vec!["3"]);
    }

    #[test]
    fn test_all_categories_is_unfiltered() {
        let catalog = sample_catalog();
        let results = query(&catalog, &FilterSpec::new().with_category(ALL_CATEGORIES));
        assert_eq!(ids(&results), vec!["1", "3"]);
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let catalog = sample_catalog();
        assert_eq!(
            ids(&query(&catalog, &FilterSpec::new().with_category("Water Activities"))),
            vec!["3"]
        );
        assert!(query(&catalog, &FilterSpec::new().with_category("water activities")).is_empty());
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let catalog = sample_catalog();
        assert!(query(&catalog, &FilterSpec::new().with_category("Space Travel")).is_empty());
    }

    #[test]
    fn test_min_relevance_above_max_matches_nothing() {
        let catalog = sample_catalog();
        assert!(query(&catalog, &FilterSpec::new().with_min_relevance(11)).is_empty());
        assert_eq!(query(&catalog, &FilterSpec::new().with_min_relevance(9)).len(), 1);
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let catalog = sample_catalog();
        // location
        assert_eq!(ids(&query(&catalog, &FilterSpec::new().with_search_text("ALPS"))), vec!["1"]);
        // category
        assert_eq!(ids(&query(&catalog, &FilterSpec::new().with_search_text("water"))), vec!["3"]);
        // description
        assert_eq!(
            ids(&query(&catalog, &FilterSpec::new().with_search_text("tour description"))),
            vec!["1"]
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let catalog = sample_catalog();
        assert_eq!(query(&catalog, &FilterSpec::new().with_search_text("  ")).len(), 2);
    }

    #[test]
    fn test_filters_combine() {
        let catalog = sample_catalog();
        let spec = FilterSpec::new()
            .with_category("Outdoor Adventure")
            .with_search_text("sailing");
        assert!(query(&catalog, &spec).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(query(&[], &FilterSpec::new()).is_empty());
        assert!(featured(&[], 4).is_empty());
        assert_eq!(categories(&[]), vec![ALL_CATEGORIES]);
    }

    #[test]
    fn test_query_is_pure() {
        let catalog = sample_catalog();
        let before = catalog.clone();
        let spec = FilterSpec::new().with_search_text("e");
        let first = query(&catalog, &spec);
        let second = query(&catalog, &spec);
        assert_eq!(first, second);
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_featured_is_stable_relevance_desc() {
        let catalog = vec![
            activity("a", "A", "X", 7),
            activity("b", "B", "X", 9),
            activity("c", "C", "Y", 7),
            activity("d", "D", "Y", 10),
            activity("e", "E", "Z", 9),
        ];
        assert_eq!(ids(&featured(&catalog, 4)), vec!["d", "b", "e", "a"]);
        assert_eq!(ids(&featured(&catalog, 10)), vec!["d", "b", "e", "a", "c"]);
    }

    #[test]
    fn test_query_with_relevance_sort_and_filter() {
        let catalog = vec![
            activity("a", "A", "X", 7),
            activity("b", "B", "Y", 9),
            activity("c", "C", "X", 8),
        ];
        let results = query_with(
            &catalog,
            &FilterSpec::new().with_category("X"),
            QueryOptions::featured(DEFAULT_FEATURED_LIMIT),
        );
        assert_eq!(ids(&results), vec!["c", "a"]);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = sample_catalog();
        assert_eq!(find_by_id(&catalog, "3").map(|a| a.name.as_str()), Some("Sunset Sailing Experience"));
        assert!(find_by_id(&catalog, "99").is_none());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = vec![
            activity("a", "A", "Nature", 1),
            activity("b", "B", "Wellness", 1),
            activity("c", "C", "Nature", 1),
        ];
        assert_eq!(categories(&catalog), vec![ALL_CATEGORIES, "Nature", "Wellness"]);
    }
}
