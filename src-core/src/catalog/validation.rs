use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use super::types::{Activity, MAX_RELEVANCE};

/// A record that breaks a catalog invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    DuplicateId { id: String },
    RelevanceOutOfRange { id: String, score: u32 },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::DuplicateId { id } => write!(f, "duplicate activity id '{}'", id),
            CatalogIssue::RelevanceOutOfRange { id, score } => write!(
                f,
                "activity '{}' has relevance {} (expected 0-{})",
                id, score, MAX_RELEVANCE
            ),
        }
    }
}

/// Report every invariant violation in a catalog snapshot.
pub fn validate_catalog(catalog: &[Activity]) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for activity in catalog {
        if !seen.insert(activity.id.as_str()) {
            issues.push(CatalogIssue::DuplicateId {
                id: activity.id.clone(),
            });
        }
        if activity.relevance_score > MAX_RELEVANCE {
            issues.push(CatalogIssue::RelevanceOutOfRange {
                id: activity.id.clone(),
                score: activity.relevance_score,
            });
        }
    }

    issues
}

/// Drop records that break an invariant, keeping the first occurrence of
/// each id. Logs one warning per dropped record.
pub fn sanitize_catalog(catalog: Vec<Activity>) -> Vec<Activity> {
    let mut seen = HashSet::new();
    catalog
        .into_iter()
        .filter(|activity| {
            if activity.relevance_score > MAX_RELEVANCE {
                warn!(
                    "Dropping activity '{}': relevance {} out of range",
                    activity.id, activity.relevance_score
                );
                return false;
            }
            if !seen.insert(activity.id.clone()) {
                warn!("Dropping activity '{}': duplicate id", activity.id);
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, score: u32) -> Activity {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Activity {}", id),
            "category": "Nature",
            "relevanceScore": score,
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_catalog_has_no_issues() {
        assert!(validate_catalog(&[activity("1", 0), activity("2", 10)]).is_empty());
    }

    #[test]
    fn test_detects_duplicates_and_range() {
        let issues = validate_catalog(&[activity("1", 5), activity("1", 6), activity("2", 11)]);
        assert_eq!(
            issues,
            vec![
                CatalogIssue::DuplicateId { id: "1".to_string() },
                CatalogIssue::RelevanceOutOfRange {
                    id: "2".to_string(),
                    score: 11
                },
            ]
        );
        assert!(issues[1].to_string().contains("expected 0-10"));
    }

    #[test]
    fn test_sanitize_keeps_first_occurrence() {
        let cleaned = sanitize_catalog(vec![
            activity("1", 5),
            activity("2", 42),
            activity("1", 9),
            activity("3", 2),
        ]);
        let kept: Vec<(&str, u32)> = cleaned
            .iter()
            .map(|a| (a.id.as_str(), a.relevance_score))
            .collect();
        assert_eq!(kept, vec![("1", 5), ("3", 2)]);
    }
}
