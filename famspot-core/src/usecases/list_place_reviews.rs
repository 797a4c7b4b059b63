use std::collections::HashMap;

use super::prelude::*;
use crate::util::{
    cursor::{decode_cursor, split_page},
    validate::{non_blank, ValidationError},
};

pub const DEFAULT_REVIEW_LIMIT: u64 = 10;
pub const MAX_REVIEW_LIMIT: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct ListPlaceReviewsParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub sort: Option<String>,
    pub has_photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewListRequest {
    pub place_id: String,
    pub params: ReviewListParams,
    pub offset: u64,
    pub limit: u64,
}

pub fn parse_review_list_request(
    place_id: &str,
    params: &ListPlaceReviewsParams,
) -> Result<ReviewListRequest> {
    let limit = match non_blank(params.limit.as_deref()) {
        Some(limit) => limit
            .parse::<i64>()
            .map_err(|_| ValidationError::field("limit", "must be an integer"))?,
        None => DEFAULT_REVIEW_LIMIT as i64,
    };
    if !(1..=MAX_REVIEW_LIMIT as i64).contains(&limit) {
        return Err(ValidationError::field(
            "limit",
            format!("must be between 1 and {MAX_REVIEW_LIMIT}"),
        )
        .into());
    }
    let sort = match non_blank(params.sort.as_deref()) {
        Some(sort) => sort
            .parse::<ReviewSortKey>()
            .map_err(|()| ValidationError::field("sort", "must be one of new, rating"))?,
        None => Default::default(),
    };
    let with_photos_only = match non_blank(params.has_photo.as_deref()) {
        None | Some("0") | Some("false") => false,
        Some("1") | Some("true") => true,
        Some(_) => {
            return Err(ValidationError::field("has_photo", "must be one of 1, 0, true, false").into())
        }
    };
    Ok(ReviewListRequest {
        place_id: place_id.to_owned(),
        params: ReviewListParams {
            sort,
            with_photos_only,
        },
        offset: decode_cursor(params.cursor.as_deref()),
        limit: limit as u64,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewListItem {
    pub review: Review,
    pub author: Option<User>,
    pub age_band: Option<AgeBand>,
    /// Pairs of (axis code, score)
    pub scores: Vec<(String, RatingValue)>,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewList {
    pub items: Vec<ReviewListItem>,
    pub next_cursor: Option<String>,
}

/// Lists the public reviews of a place.
pub fn list_place_reviews<R>(repo: &R, req: &ReviewListRequest) -> Result<ReviewList>
where
    R: PlaceRepo + ReviewRepo + ReferenceRepo + PhotoRepo + UserRepo,
{
    let place = repo.get_place(&req.place_id)?;
    let pagination = Pagination {
        offset: Some(req.offset),
        limit: Some(req.limit + 1),
    };
    let reviews = repo.load_public_reviews_of_place(place.id.as_str(), &req.params, &pagination)?;
    let (reviews, next_cursor) = split_page(reviews, req.offset, req.limit);

    let review_ids: Vec<_> = reviews.iter().map(|r| r.id.as_str()).collect();
    let mut scores: HashMap<Id, Vec<(String, RatingValue)>> = HashMap::new();
    for (review_id, code, score) in repo.load_review_scores_with_axis_codes(&review_ids)? {
        scores.entry(review_id).or_default().push((code, score));
    }
    let mut photos: HashMap<Id, Vec<Photo>> = HashMap::new();
    for photo in repo.load_photos_of_reviews(&review_ids)? {
        if let Some(review_id) = photo.review_id.clone() {
            photos.entry(review_id).or_default().push(photo);
        }
    }
    let mut author_ids: Vec<_> = reviews.iter().map(|r| r.author_id.as_str()).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let authors: HashMap<Id, User> = repo
        .get_users(&author_ids)?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();
    let age_bands = repo.all_age_bands()?;

    let items = reviews
        .into_iter()
        .map(|review| ReviewListItem {
            author: authors.get(&review.author_id).cloned(),
            age_band: review
                .age_band_id
                .as_ref()
                .and_then(|id| age_bands.iter().find(|b| &b.id == id))
                .cloned(),
            scores: scores.remove(&review.id).unwrap_or_default(),
            photos: photos.remove(&review.id).unwrap_or_default(),
            review,
        })
        .collect();
    Ok(ReviewList { items, next_cursor })
}
