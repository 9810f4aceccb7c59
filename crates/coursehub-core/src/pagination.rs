//! Page-based pagination for list endpoints.
//!
//! List endpoints accept `?page=&limit=` and answer with a [`Page`]:
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta": { "total": 42, "page": 2, "limit": 10, "has_more": true }
//! }
//! ```
//!
//! - `limit` is clamped to `[1, 100]` (default 20)
//! - `page` is 1-indexed and clamped to `[1, i64::MAX / 100]`; pages past
//!   the end come back empty

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;
/// Keeps `offset() + limit()` within `i64` for any query input.
const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Query strings arrive as text; an empty value means "not provided".
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PageParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Builds the response metadata for a query that matched `total` rows.
    #[must_use]
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            total,
            page: self.page(),
            limit: self.limit(),
            has_more: self.offset().saturating_add(self.limit()) < total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, params: &PageParams, total: i64) -> Self {
        Self {
            data,
            meta: params.meta(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_offset_follows_page() {
        let params = PageParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_limits_are_clamped() {
        let too_big = PageParams {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!(too_big.limit(), 100);
        assert_eq!(too_big.page(), 1);

        let negative = PageParams {
            page: Some(-4),
            limit: Some(-1),
        };
        assert_eq!(negative.limit(), 1);
        assert_eq!(negative.offset(), 0);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let params: PageParams =
            serde_json::from_str(r#"{"page":"9223372036854775807","limit":"100"}"#).unwrap();
        assert_eq!(params.page(), MAX_PAGE);
        assert!(params.offset() > 0);
        assert_eq!(params.offset(), (MAX_PAGE - 1) * 100);

        let meta = params.meta(42);
        assert!(!meta.has_more);
        assert_eq!(meta.total, 42);

        let minimum = PageParams {
            page: Some(i64::MIN),
            limit: Some(i64::MAX),
        };
        assert_eq!(minimum.page(), 1);
        assert_eq!(minimum.limit(), 100);
        assert_eq!(minimum.offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let params = PageParams {
            page: Some(2),
            limit: Some(10),
        };
        assert!(params.meta(25).has_more);
        assert!(!params.meta(20).has_more);
    }

    #[test]
    fn test_deserialize_strings_and_blanks() {
        let params: PageParams = serde_json::from_str(r#"{"page":"2","limit":""}"#).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.limit(), 20);

        let params: PageParams = serde_json::from_str(r#"{"page":4}"#).unwrap();
        assert_eq!(params.page(), 4);
    }

    #[test]
    fn test_deserialize_rejects_non_numeric() {
        let parsed = serde_json::from_str::<PageParams>(r#"{"page":"two"}"#);
        assert!(parsed.is_err());
    }
}
