use super::prelude::*;

/// The maximum number of photos in the detail view.
pub const MAX_DETAIL_PHOTOS: u64 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub overall: Option<AvgRatingValue>,
    pub count: u64,
}

impl RatingSummary {
    pub fn from_stats(stats: Option<&PlaceStats>) -> Self {
        match stats {
            Some(stats) => Self {
                overall: stats.avg_overall,
                count: stats.review_count,
            },
            None => Self {
                overall: None,
                count: 0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetail {
    pub place: Place,
    pub category: Category,
    /// Only present features
    pub features: Vec<PlaceFeatureWithRef>,
    pub stats: Option<PlaceStats>,
    /// Most recent photos first
    pub photos: Vec<Photo>,
}

impl PlaceDetail {
    pub fn rating(&self) -> RatingSummary {
        RatingSummary::from_stats(self.stats.as_ref())
    }
}

pub fn load_place_detail<R>(repo: &R, id: &str) -> Result<PlaceDetail>
where
    R: PlaceRepo + ReferenceRepo + PlaceStatsRepo + PhotoRepo,
{
    let place = repo.get_place(id)?;
    let category = repo.get_category(place.category_id.as_str())?;
    let features = repo
        .load_present_place_features(id)?
        .into_iter()
        .filter(PlaceFeatureWithRef::is_present)
        .collect();
    // The statistics are a cache that is allowed to be
    // missing or stale.
    let stats = repo.get_place_stats(id).unwrap_or_else(|err| {
        log::warn!("Failed to load statistics of place {id}: {err}");
        None
    });
    let photos = repo.load_recent_place_photos(id, MAX_DETAIL_PHOTOS)?;
    Ok(PlaceDetail {
        place,
        category,
        features,
        stats,
        photos,
    })
}
