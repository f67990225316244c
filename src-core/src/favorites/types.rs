use serde::{Deserialize, Serialize};

use crate::catalog::Activity;

/// The slice of an activity kept in the favorites blob.
///
/// Deliberately small: the persisted layout stays stable even when catalog
/// records gain fields. The id is not checked against any catalog, so an
/// entry may outlive the activity it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: String,
}

impl FavoriteEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: Option<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image,
            location: location.into(),
        }
    }
}

impl From<&Activity> for FavoriteEntry {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id.clone(),
            name: activity.name.clone(),
            image: activity.image.clone(),
            location: activity.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_activity_projects_four_fields() {
        let activity: Activity = serde_json::from_value(serde_json::json!({
            "id": "5",
            "name": "Wildlife Safari Adventure",
            "category": "Nature",
            "relevanceScore": 9,
            "image": "/wildlifesafari.jpg",
            "location": "Serengeti, Tanzania",
            "price": 195,
        }))
        .unwrap();

        let entry = FavoriteEntry::from(&activity);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({
                "id": "5",
                "name": "Wildlife Safari Adventure",
                "image": "/wildlifesafari.jpg",
                "location": "Serengeti, Tanzania",
            })
        );
    }

    #[test]
    fn test_tolerates_missing_optional_fields() {
        let entry: FavoriteEntry = serde_json::from_str(r#"{"id":"9","name":"Scuba"}"#).unwrap();
        assert_eq!(entry, FavoriteEntry::new("9", "Scuba", None, ""));
    }
}
