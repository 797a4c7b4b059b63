pub use famspot_boundary::*;

use std::collections::BTreeMap;

use crate::core::{entities as e, usecases};

pub mod from_json {
    //! JSON -> Entity

    use super::*;

    // NOTE:
    // We cannot impl From<T> here, because the JSON structs
    // and the use case parameters both are outside this crate.

    pub fn new_review(from: NewReview) -> usecases::NewReview {
        let NewReview {
            place_id,
            overall,
            age_band_id,
            stay_minutes,
            revisit_intent,
            text,
            axes,
            photo_ids,
        } = from;
        usecases::NewReview {
            place_id,
            overall,
            age_band_id,
            stay_minutes,
            revisit_intent,
            text,
            axes: axes
                .into_iter()
                .map(|NewAxisScore { code, score }| usecases::NewAxisScore { code, score })
                .collect(),
            photo_ids,
        }
    }
}

pub mod to_json {
    //! Entity -> JSON

    use super::*;

    /// Resolves the storage path of a photo into a URL.
    ///
    /// Absolute URLs are passed through, relative paths are
    /// prefixed with the public media location.
    pub fn photo_url(public_media_url: Option<&str>, storage_path: &str) -> String {
        if storage_path.starts_with("http://") || storage_path.starts_with("https://") {
            return storage_path.to_owned();
        }
        match public_media_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                storage_path.trim_start_matches('/')
            ),
            None => storage_path.to_owned(),
        }
    }

    pub fn photo_ref(public_media_url: Option<&str>, photo: e::Photo) -> PhotoRef {
        let e::Photo {
            id,
            storage_path,
            width,
            height,
            ..
        } = photo;
        PhotoRef {
            id: id.into(),
            url: photo_url(public_media_url, &storage_path),
            width,
            height,
        }
    }

    fn avg_rating(avg: Option<e::AvgRatingValue>) -> Option<f64> {
        // Rounded to two decimals
        avg.map(|avg| (f64::from(avg) * 100.0).round() / 100.0)
    }

    pub fn place_search_item(
        public_media_url: Option<&str>,
        from: usecases::PlaceSearchItem,
    ) -> PlaceSearchItem {
        let usecases::PlaceSearchItem {
            place,
            features_summary,
            thumbnail,
        } = from;
        let crate::core::db::IndexedPlace {
            id,
            name,
            category_code,
            category_label,
            pos,
            distance,
            avg_overall,
            review_count,
            created_at,
        } = place;
        let (lat, lng) = pos.to_lat_lng_deg();
        PlaceSearchItem {
            id: id.into(),
            name,
            category: CategoryRef {
                code: category_code,
                label: category_label,
            },
            location: Location {
                lat,
                lng,
                distance_m: Some(distance.to_meters()),
            },
            features_summary,
            rating: RatingSummary {
                overall: avg_rating(avg_overall),
                count: review_count,
            },
            thumbnail_url: thumbnail.map(|photo| photo_url(public_media_url, &photo.storage_path)),
            created_at: created_at.into(),
        }
    }

    pub fn place_search_response(
        public_media_url: Option<&str>,
        from: usecases::SearchResult,
    ) -> PlaceSearchResponse {
        let usecases::SearchResult { items, next_cursor } = from;
        PlaceSearchResponse {
            items: items
                .into_iter()
                .map(|item| place_search_item(public_media_url, item))
                .collect(),
            next_cursor,
        }
    }

    fn opening_hours(raw: String) -> serde_json::Value {
        serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
    }

    pub fn place_detail(public_media_url: Option<&str>, from: usecases::PlaceDetail) -> PlaceDetail {
        let rating = from.rating();
        let usecases::PlaceDetail {
            place,
            category,
            features,
            stats: _,
            photos,
        } = from;
        let source = ExternalSource::from_provenance(&place.provenance);
        let e::Place {
            id,
            name,
            kana,
            category_id: _,
            description,
            address,
            phone,
            website_url,
            price_range,
            opening_hours: raw_opening_hours,
            pos,
            provenance: _,
            created_at,
            updated_at,
        } = place;
        PlaceDetail {
            id: id.into(),
            name,
            kana,
            category: category.into(),
            description,
            address,
            phone,
            website_url,
            price_range,
            opening_hours: raw_opening_hours.map(opening_hours),
            location: pos.into(),
            features: features.into_iter().map(Into::into).collect(),
            rating: PlaceRating {
                overall: avg_rating(rating.overall),
                count: rating.count,
                axes: BTreeMap::new(),
            },
            photos: photos
                .into_iter()
                .map(|photo| photo_ref(public_media_url, photo))
                .collect(),
            source,
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }

    pub fn review_item(public_media_url: Option<&str>, from: usecases::ReviewListItem) -> ReviewItem {
        let usecases::ReviewListItem {
            review,
            author,
            age_band,
            scores,
            photos,
        } = from;
        let e::Review {
            id,
            author_id,
            overall,
            stay_minutes,
            revisit_intent,
            text,
            created_at,
            ..
        } = review;
        let user = author.map(UserRef::from).unwrap_or_else(|| UserRef {
            id: author_id.into(),
            nickname: None,
        });
        ReviewItem {
            id: id.into(),
            user,
            overall: overall.into(),
            age_band: age_band.map(|band| band.label),
            stay_minutes,
            revisit_intent: revisit_intent.map(Into::into),
            text,
            axes: scores
                .into_iter()
                .map(|(code, score)| (code, score.into()))
                .collect(),
            photos: photos
                .into_iter()
                .map(|photo| photo_ref(public_media_url, photo))
                .collect(),
            created_at: created_at.into(),
        }
    }

    pub fn review_list_response(
        public_media_url: Option<&str>,
        from: usecases::ReviewList,
    ) -> ReviewListResponse {
        let usecases::ReviewList { items, next_cursor } = from;
        ReviewListResponse {
            items: items
                .into_iter()
                .map(|item| review_item(public_media_url, item))
                .collect(),
            next_cursor,
        }
    }
}
