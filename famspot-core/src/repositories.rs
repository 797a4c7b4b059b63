// Low-level database access traits.
// Each repository is responsible for a single entity and
// its relationships. Related entities are only referenced
// by their id and never modified or loaded by another
// repository.

use std::str::FromStr;

use crate::entities::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub trait PlaceRepo {
    fn get_place(&self, id: &str) -> Result<Place>;
    fn get_place_by_external_id(&self, external_id: &str) -> Result<Place>;
    fn count_places(&self) -> Result<usize>;

    /// Inserts a new place or overwrites all fields of an
    /// existing place with the same id.
    fn create_or_update_place(&self, place: &Place) -> Result<()>;

    fn replace_place_features(&self, place_id: &str, features: &[PlaceFeature]) -> Result<()>;

    /// Only features with a positive value, ordered by their code.
    fn load_present_place_features(&self, place_id: &str) -> Result<Vec<PlaceFeatureWithRef>>;

    /// Pairs of (place id, feature code) for all present features, ordered
    /// by feature code.
    fn load_present_feature_codes_of_places(
        &self,
        place_ids: &[&str],
    ) -> Result<Vec<(Id, String)>>;
}

pub trait ReferenceRepo {
    fn all_categories(&self) -> Result<Vec<Category>>;
    fn get_category(&self, id: &str) -> Result<Category>;
    fn get_category_by_code(&self, code: &str) -> Result<Category>;

    fn all_features(&self) -> Result<Vec<Feature>>;
    fn features_by_codes(&self, codes: &[&str]) -> Result<Vec<Feature>>;

    fn all_age_bands(&self) -> Result<Vec<AgeBand>>;
    fn get_age_band(&self, id: &str) -> Result<AgeBand>;

    fn all_review_axes(&self) -> Result<Vec<ReviewAxis>>;
    fn review_axes_by_codes(&self, codes: &[&str]) -> Result<Vec<ReviewAxis>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSortKey {
    /// Newest first
    #[default]
    New,
    /// Best overall rating first
    Rating,
}

impl FromStr for ReviewSortKey {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" | "newest" => Ok(Self::New),
            "rating" => Ok(Self::Rating),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewListParams {
    pub sort: ReviewSortKey,
    pub with_photos_only: bool,
}

pub trait ReviewRepo {
    fn create_review(&self, review: &Review) -> Result<()>;
    fn create_review_scores(&self, scores: &[ReviewScore]) -> Result<()>;

    fn count_reviews(&self) -> Result<usize>;
    fn count_review_scores(&self) -> Result<usize>;

    /// The overall rating and creation time of every public review of a place.
    fn load_public_review_ratings(&self, place_id: &str) -> Result<Vec<(RatingValue, Timestamp)>>;

    fn load_public_reviews_of_place(
        &self,
        place_id: &str,
        params: &ReviewListParams,
        pagination: &Pagination,
    ) -> Result<Vec<Review>>;

    /// Triples of (review id, axis code, score).
    fn load_review_scores_with_axis_codes(
        &self,
        review_ids: &[&str],
    ) -> Result<Vec<(Id, String, RatingValue)>>;
}

pub trait PhotoRepo {
    fn create_photo(&self, photo: &Photo) -> Result<()>;
    fn get_photo(&self, id: &str) -> Result<Photo>;

    /// Fetches the subset of the given photos that are review photos
    /// uploaded by `uploaded_by` and not yet attached to any review.
    ///
    /// Must only be invoked within a write transaction that holds the
    /// lock on the photos until it commits, i.e. no concurrent transaction
    /// can attach the returned photos in the meantime.
    fn lock_attachable_review_photos(&self, uploaded_by: &str, ids: &[&str]) -> Result<Vec<Photo>>;

    /// Returns the number of photos that have actually been attached.
    fn attach_photos_to_review(&self, ids: &[&str], review_id: &str, place_id: &str)
        -> Result<usize>;

    /// Photos belonging to the place directly or through one of its reviews.
    fn count_place_photos(&self, place_id: &str) -> Result<u64>;
    fn count_photos(&self) -> Result<usize>;

    /// Most recent photos first.
    fn load_recent_place_photos(&self, place_id: &str, limit: u64) -> Result<Vec<Photo>>;

    /// At most one photo per place, the most recent one.
    fn load_latest_photo_of_places(&self, place_ids: &[&str]) -> Result<Vec<Photo>>;

    fn load_photos_of_reviews(&self, review_ids: &[&str]) -> Result<Vec<Photo>>;
}

pub trait PlaceStatsRepo {
    fn get_place_stats(&self, place_id: &str) -> Result<Option<PlaceStats>>;

    /// Overwrites all aggregates of an existing row at once.
    fn upsert_place_stats(&self, stats: &PlaceStats) -> Result<()>;
}

pub trait UserRepo {
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<User>;
    fn get_users(&self, ids: &[&str]) -> Result<Vec<User>>;
}
