#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use diesel::sql_types::{BigInt, Double, Nullable, Text};
use famspot_core::entities::*;

use super::schema::*;

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub nickname: Option<&'a str>,
    pub created_at: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: String,
    pub email: String,
    pub nickname: Option<String>,
}

impl From<UserEntity> for User {
    fn from(from: UserEntity) -> Self {
        let UserEntity {
            id,
            email,
            nickname,
        } = from;
        Self {
            id: id.into(),
            email,
            nickname,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = categories)]
pub struct CategoryEntity {
    pub id: String,
    pub code: String,
    pub label: String,
    pub sort: i32,
}

impl From<CategoryEntity> for Category {
    fn from(from: CategoryEntity) -> Self {
        let CategoryEntity {
            id,
            code,
            label,
            sort,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            sort,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = features)]
pub struct FeatureEntity {
    pub id: String,
    pub code: String,
    pub label: String,
    pub group_tag: Option<String>,
    pub description: Option<String>,
}

impl From<FeatureEntity> for Feature {
    fn from(from: FeatureEntity) -> Self {
        let FeatureEntity {
            id,
            code,
            label,
            group_tag,
            description,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            group: group_tag,
            description,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = age_bands)]
pub struct AgeBandEntity {
    pub id: String,
    pub code: String,
    pub label: String,
    pub sort: i32,
}

impl From<AgeBandEntity> for AgeBand {
    fn from(from: AgeBandEntity) -> Self {
        let AgeBandEntity {
            id,
            code,
            label,
            sort,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            sort,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = review_axes)]
pub struct ReviewAxisEntity {
    pub id: String,
    pub code: String,
    pub label: String,
    pub sort: i32,
}

impl From<ReviewAxisEntity> for ReviewAxis {
    fn from(from: ReviewAxisEntity) -> Self {
        let ReviewAxisEntity {
            id,
            code,
            label,
            sort,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            sort,
        }
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = places, treat_none_as_null = true)]
pub struct NewPlace<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub kana: Option<&'a str>,
    pub category_id: &'a str,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website_url: Option<&'a str>,
    pub price_range: Option<&'a str>,
    pub opening_hours: Option<&'a str>,
    pub lat: f64,
    pub lng: f64,
    pub external_id: Option<&'a str>,
    pub data_source: &'a str,
    pub manual_lock: bool,
    pub synced_at: Option<i64>,
    pub search_text: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl<'a> From<&'a Place> for NewPlace<'a> {
    fn from(from: &'a Place) -> Self {
        let Place {
            id,
            name,
            kana,
            category_id,
            description,
            address,
            phone,
            website_url,
            price_range,
            opening_hours,
            pos,
            provenance,
            created_at,
            updated_at,
        } = from;
        Self {
            id: id.as_str(),
            name,
            kana: kana.as_deref(),
            category_id: category_id.as_str(),
            description: description.as_deref(),
            address: address.as_deref(),
            phone: phone.as_deref(),
            website_url: website_url.as_deref(),
            price_range: price_range.as_deref(),
            opening_hours: opening_hours.as_deref(),
            lat: pos.lat(),
            lng: pos.lng(),
            external_id: provenance.external_id.as_deref(),
            data_source: provenance.data_source.as_ref(),
            manual_lock: provenance.manual_lock,
            synced_at: provenance.synced_at.map(Timestamp::as_millis),
            search_text: from.search_text(),
            created_at: created_at.as_millis(),
            updated_at: updated_at.as_millis(),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = places)]
pub struct PlaceEntity {
    pub id: String,
    pub name: String,
    pub kana: Option<String>,
    pub category_id: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub price_range: Option<String>,
    pub opening_hours: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub external_id: Option<String>,
    pub data_source: String,
    pub manual_lock: bool,
    pub synced_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = place_features)]
pub struct NewPlaceFeature<'a> {
    pub place_id: &'a str,
    pub feature_id: &'a str,
    pub value: Option<i16>,
    pub detail: Option<&'a str>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = place_stats, treat_none_as_null = true)]
pub struct NewPlaceStats<'a> {
    pub place_id: &'a str,
    pub avg_overall: Option<f64>,
    pub review_count: i64,
    pub photo_count: i64,
    pub last_reviewed_at: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = place_stats)]
pub struct PlaceStatsEntity {
    pub place_id: String,
    pub avg_overall: Option<f64>,
    pub review_count: i64,
    pub photo_count: i64,
    pub last_reviewed_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReview<'a> {
    pub id: &'a str,
    pub place_id: &'a str,
    pub user_id: &'a str,
    pub overall: i16,
    pub age_band_id: Option<&'a str>,
    pub stay_minutes: Option<i32>,
    pub revisit_intent: Option<i16>,
    pub text: &'a str,
    pub status: &'a str,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = reviews)]
pub struct ReviewEntity {
    pub id: String,
    pub place_id: String,
    pub user_id: String,
    pub overall: i16,
    pub age_band_id: Option<String>,
    pub stay_minutes: Option<i32>,
    pub revisit_intent: Option<i16>,
    pub text: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = review_scores)]
pub struct NewReviewScore<'a> {
    pub review_id: &'a str,
    pub axis_id: &'a str,
    pub score: i16,
}

#[derive(Insertable)]
#[diesel(table_name = photos)]
pub struct NewPhoto<'a> {
    pub id: &'a str,
    pub purpose: &'a str,
    pub storage_path: &'a str,
    pub place_id: Option<&'a str>,
    pub review_id: Option<&'a str>,
    pub uploaded_by: &'a str,
    pub mime_type: Option<&'a str>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub file_size: Option<i64>,
    pub created_at: i64,
}

#[derive(Queryable, QueryableByName, Selectable)]
#[diesel(table_name = photos)]
pub struct PhotoEntity {
    pub id: String,
    pub purpose: String,
    pub storage_path: String,
    pub place_id: Option<String>,
    pub review_id: Option<String>,
    pub uploaded_by: String,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub file_size: Option<i64>,
    pub created_at: i64,
}

/// A single row of the geo search query.
#[derive(QueryableByName)]
pub struct IndexedPlaceRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub category_code: String,
    #[diesel(sql_type = Text)]
    pub category_label: String,
    #[diesel(sql_type = Double)]
    pub lat: f64,
    #[diesel(sql_type = Double)]
    pub lng: f64,
    #[diesel(sql_type = Double)]
    pub distance: f64,
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_overall: Option<f64>,
    #[diesel(sql_type = BigInt)]
    pub review_count: i64,
    #[diesel(sql_type = BigInt)]
    pub created_at: i64,
}
