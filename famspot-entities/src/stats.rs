use crate::{id::Id, rating::AvgRatingValue, time::Timestamp};

/// Denormalized aggregates of a place, derived from its
/// public reviews and photos.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceStats {
    pub place_id         : Id,
    /// Unset while the place has no public reviews.
    pub avg_overall      : Option<AvgRatingValue>,
    pub review_count     : u64,
    pub photo_count      : u64,
    pub last_reviewed_at : Timestamp,
}
