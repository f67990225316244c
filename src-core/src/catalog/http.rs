use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, WanderLensError};

use super::filter_params::to_query_string;
use super::provider::CatalogProvider;
use super::types::{Activity, FilterSpec};

/// Client for the WanderLens catalog API.
///
/// Endpoints, relative to the base URL:
/// - `GET /activities?category=..&minRelevance=..&search=..`
/// - `GET /activities/{id}`
/// - `GET /activities/featured?limit=N`
/// - `GET /categories`
pub struct HttpCatalogProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let builder = reqwest::Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .user_agent("WanderLens/1.0")
            .timeout(config.request_timeout());

        let client = builder
            .build()
            .map_err(|e| WanderLensError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document. Any non-success status, 404 included, is an
    /// error so a fallback layer can answer instead.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WanderLensError::Http {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_activities(&self, spec: &FilterSpec) -> Result<Vec<Activity>> {
        let query = to_query_string(spec);
        let path = if query.is_empty() {
            "/activities".to_string()
        } else {
            format!("/activities?{}", query)
        };
        let activities: Vec<Activity> = self.get_json(&path).await?;
        info!("Fetched {} activities from {}", activities.len(), self.base_url);
        Ok(activities)
    }

    async fn fetch_activity_by_id(&self, id: &str) -> Result<Option<Activity>> {
        let path = format!("/activities/{}", urlencode_segment(id));
        self.get_json(&path).await.map(Some)
    }

    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Activity>> {
        self.get_json(&format!("/activities/featured?limit={}", limit))
            .await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        self.get_json("/categories").await
    }
}

/// Percent-encode an id for use as a single path segment.
fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
