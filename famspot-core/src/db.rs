use std::str::FromStr;

use crate::{
    entities::*,
    repositories::{Error, Pagination},
};

type Result<T> = std::result::Result<T, Error>;

/// Primary ordering of geo search results.
///
/// Ties are always broken by distance and then by place id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceSortKey {
    #[default]
    Distance,
    /// Average rating descending, unrated places last
    Score,
    /// Number of reviews descending
    ReviewCount,
    /// Creation time descending
    Newest,
}

impl FromStr for PlaceSortKey {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "distance" => Ok(Self::Distance),
            "score" => Ok(Self::Score),
            "reviews" | "review_count" | "review-count" => Ok(Self::ReviewCount),
            "new" | "newest" => Ok(Self::Newest),
            _ => Err(()),
        }
    }
}

/// A validated, conjunctive query for places around a center point.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceGeoQuery {
    pub center        : MapPoint,
    pub radius        : Distance,
    pub category      : Option<String>,
    /// Lower-case terms that must all occur in the search text.
    pub text_terms    : Vec<String>,
    /// Features that must all be present.
    pub feature_codes : Vec<String>,
    pub sort          : PlaceSortKey,
}

impl PlaceGeoQuery {
    pub fn new(center: MapPoint, radius: Distance) -> Self {
        Self {
            center,
            radius,
            category: None,
            text_terms: vec![],
            feature_codes: vec![],
            sort: Default::default(),
        }
    }

    /// Coarse prefilter that encloses the search circle.
    pub fn bbox(&self) -> MapBbox {
        MapBbox::around(self.center, self.radius)
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPlace {
    pub id             : Id,
    pub name           : String,
    pub category_code  : String,
    pub category_label : String,
    pub pos            : MapPoint,
    pub distance       : Distance,
    pub avg_overall    : Option<AvgRatingValue>,
    pub review_count   : u64,
    pub created_at     : Timestamp,
}

pub trait PlaceGeoIndex {
    /// Finds all places within the radius that match every filter,
    /// in the deterministic order given by the sort key.
    fn query_places_within(
        &self,
        query: &PlaceGeoQuery,
        pagination: &Pagination,
    ) -> Result<Vec<IndexedPlace>>;
}
