use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(feature = "entity-conversions")]
mod conv;

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Items<T> {
    pub items: Vec<T>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct CategoryRef {
    pub code: String,
    pub label: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    /// Only present in search results.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance_m: Option<f64>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct RatingSummary {
    /// `null` if the place has not been rated yet.
    pub overall: Option<f64>,
    pub count: u64,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PlaceSearchItem {
    pub id               : String,
    pub name             : String,
    pub category         : CategoryRef,
    pub location         : Location,
    pub features_summary : Vec<String>,
    pub rating           : RatingSummary,
    pub thumbnail_url    : Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at       : OffsetDateTime,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PlaceSearchResponse {
    pub items: Vec<PlaceSearchItem>,
    /// `null` on the last page.
    pub next_cursor: Option<String>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct PlaceFeature {
    pub code   : String,
    pub label  : String,
    pub group  : Option<String>,
    pub value  : Option<i16>,
    pub detail : Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct PhotoRef {
    pub id: String,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PlaceRating {
    pub overall: Option<f64>,
    pub count: u64,
    /// Average score per review axis, not aggregated yet.
    pub axes: BTreeMap<String, f64>,
}

/// Provenance of a place that is synchronized from an external provider.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ExternalSource {
    pub id: String,
    pub source: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub synced_at: Option<OffsetDateTime>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PlaceDetail {
    pub id            : String,
    pub name          : String,
    pub kana          : Option<String>,
    pub category      : CategoryRef,
    pub description   : Option<String>,
    pub address       : Option<String>,
    pub phone         : Option<String>,
    pub website_url   : Option<String>,
    pub price_range   : Option<String>,
    /// Structured opening hours as stored.
    pub opening_hours : Option<serde_json::Value>,
    pub location      : Location,
    pub features      : Vec<PlaceFeature>,
    pub rating        : PlaceRating,
    pub photos        : Vec<PhotoRef>,
    pub source        : Option<ExternalSource>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at    : OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at    : OffsetDateTime,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct UserRef {
    pub id: String,
    pub nickname: Option<String>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ReviewItem {
    pub id             : String,
    pub user           : UserRef,
    pub overall        : u8,
    /// Label of the age band
    pub age_band       : Option<String>,
    pub stay_minutes   : Option<u32>,
    pub revisit_intent : Option<u8>,
    pub text           : String,
    /// Score per axis code
    pub axes           : BTreeMap<String, u8>,
    pub photos         : Vec<PhotoRef>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at     : OffsetDateTime,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ReviewListResponse {
    pub items: Vec<ReviewItem>,
    pub next_cursor: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct NewAxisScore {
    pub code: String,
    pub score: i64,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct NewReview {
    pub place_id       : String,
    pub overall        : i64,
    #[serde(default)]
    pub age_band_id    : Option<String>,
    #[serde(default)]
    pub stay_minutes   : Option<i64>,
    #[serde(default)]
    pub revisit_intent : Option<i64>,
    #[serde(default)]
    pub text           : String,
    #[serde(default)]
    pub axes           : Vec<NewAxisScore>,
    #[serde(default)]
    pub photo_ids      : Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct CreatedReview {
    pub review_id: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Category {
    pub id: String,
    pub code: String,
    pub label: String,
    pub sort: i32,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Feature {
    pub id: String,
    pub code: String,
    pub label: String,
    pub group: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct AgeBand {
    pub id: String,
    pub code: String,
    pub label: String,
    pub sort: i32,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ReviewAxis {
    pub id: String,
    pub code: String,
    pub label: String,
    pub sort: i32,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ExternalPlaceFeature {
    pub code   : String,
    #[serde(default)]
    pub value  : Option<i16>,
    #[serde(default)]
    pub detail : Option<String>,
}

/// A place record of an external provider as read by the importer.
#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ExternalPlace {
    pub external_id   : String,
    pub name          : String,
    #[serde(default)]
    pub kana          : Option<String>,
    /// Category code
    pub category      : String,
    pub lat           : f64,
    pub lng           : f64,
    #[serde(default)]
    pub description   : Option<String>,
    #[serde(default)]
    pub address       : Option<String>,
    #[serde(default)]
    pub phone         : Option<String>,
    #[serde(default)]
    pub website_url   : Option<String>,
    #[serde(default)]
    pub price_range   : Option<String>,
    /// Stored as an opaque JSON document.
    #[serde(default)]
    pub opening_hours : Option<serde_json::Value>,
    #[serde(default)]
    pub features      : Vec<ExternalPlaceFeature>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq, Eq))]
pub struct Pong {
    pub pong: bool,
}

/// Classification of all errors the API responds with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    RateLimited,
    Conflict,
    ServerError,
    BadRequest,
    ApiError,
}

impl ErrorCode {
    /// The HTTP status code that is sent along with the error.
    pub const fn status_code(self) -> u16 {
        match self {
            Self::ValidationError | Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict => 409,
            Self::RateLimited => 429,
            Self::ServerError => 500,
            Self::ApiError => 502,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::RateLimited => "RATE_LIMITED",
            Self::Conflict => "CONFLICT",
            Self::ServerError => "SERVER_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::ApiError => "API_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    /// Additional, machine readable information, e.g. the
    /// offending fields of a validation error.
    pub details: serde_json::Value,
    pub trace_id: String,
}

/// The uniform envelope of all error responses.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_error_envelope() {
        let response = ErrorResponse {
            error: ErrorBody {
                code: ErrorCode::ValidationError,
                message: "Invalid query".into(),
                details: json!({ "lat": ["is required"] }),
                trace_id: "req_0123456789ab".into(),
            },
        };
        assert_eq!(
            json!({
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Invalid query",
                    "details": { "lat": ["is required"] },
                    "trace_id": "req_0123456789ab",
                }
            }),
            serde_json::to_value(&response).unwrap()
        );
    }

    #[test]
    fn error_code_string_matches_serialization() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::MethodNotAllowed,
            ErrorCode::ServerError,
            ErrorCode::ApiError,
        ] {
            assert_eq!(
                serde_json::Value::String(code.to_string()),
                serde_json::to_value(code).unwrap()
            );
        }
        assert_eq!(429, ErrorCode::RateLimited.status_code());
    }

    #[test]
    fn serialize_search_item() {
        let item = PlaceSearchItem {
            id: "p1".into(),
            name: "Park".into(),
            category: CategoryRef {
                code: "park".into(),
                label: "Park".into(),
            },
            location: Location {
                lat: 35.0,
                lng: 139.0,
                distance_m: Some(12.5),
            },
            features_summary: vec!["diaper_table".into()],
            rating: RatingSummary {
                overall: None,
                count: 0,
            },
            thumbnail_url: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        assert_eq!(
            json!({
                "id": "p1",
                "name": "Park",
                "category": { "code": "park", "label": "Park" },
                "location": { "lat": 35.0, "lng": 139.0, "distance_m": 12.5 },
                "features_summary": ["diaper_table"],
                "rating": { "overall": null, "count": 0 },
                "thumbnail_url": null,
                "created_at": "1970-01-01T00:00:00Z",
            }),
            serde_json::to_value(&item).unwrap()
        );
    }

    #[test]
    fn deserialize_new_review_with_defaults() {
        let review: NewReview = serde_json::from_value(json!({
            "place_id": "p1",
            "overall": 5,
            "axes": [{ "code": "cleanliness", "score": 4 }],
        }))
        .unwrap();
        assert_eq!("p1", review.place_id);
        assert_eq!(5, review.overall);
        assert!(review.text.is_empty());
        assert!(review.photo_ids.is_empty());
        assert_eq!(None, review.age_band_id);
        assert_eq!(1, review.axes.len());
    }
}
