pub mod fallback;
pub mod filter_params;
pub mod http;
pub mod provider;
pub mod query;
pub mod types;
pub mod validation;

pub use fallback::{FallbackCatalog, StaticCatalog};
pub use http::HttpCatalogProvider;
pub use provider::CatalogProvider;
pub use query::{query, query_with, QueryOptions, SortOrder, DEFAULT_FEATURED_LIMIT};
pub use types::{Activity, FilterSpec, Reviews, ALL_CATEGORIES, MAX_RELEVANCE};
pub use validation::{validate_catalog, CatalogIssue};
