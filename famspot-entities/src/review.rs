use strum::{AsRefStr, Display, EnumString};

use crate::{id::Id, rating::RatingValue, time::Timestamp};

/// Moderation status of a review.
///
/// Only public reviews are visible and counted in place statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Public,
    Pending,
    Hidden,
}

impl ReviewStatus {
    pub fn is_visible(self) -> bool {
        self == Self::Public
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id             : Id,
    pub place_id       : Id,
    pub author_id      : Id,
    pub overall        : RatingValue,
    pub age_band_id    : Option<Id>,
    pub stay_minutes   : Option<u32>,
    pub revisit_intent : Option<RatingValue>,
    pub text           : String,
    pub status         : ReviewStatus,
    pub created_at     : Timestamp,
    pub updated_at     : Timestamp,
}

/// Reference data: a dimension along which a review scores a place.
#[rustfmt::skip]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReviewAxis {
    pub id    : Id,
    pub code  : String,
    pub label : String,
    pub sort  : i32,
}

/// The score of a review on a single axis.
///
/// Each axis is scored at most once per review.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewScore {
    pub review_id : Id,
    pub axis_id   : Id,
    pub score     : RatingValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_public_reviews_are_visible() {
        assert!(ReviewStatus::Public.is_visible());
        assert!(!ReviewStatus::Pending.is_visible());
        assert!(!ReviewStatus::Hidden.is_visible());
        assert_eq!(Ok(ReviewStatus::Hidden), "hidden".parse());
        assert_eq!("pending", ReviewStatus::Pending.to_string());
    }
}
