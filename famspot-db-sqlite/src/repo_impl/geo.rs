use diesel::{
    query_builder::BoxedSqlQuery,
    sql_types::{BigInt, Double, Text},
    sqlite::Sqlite,
};

use super::*;

impl_repo!(PlaceGeoIndex {
    read fn query_places_within(&self, query: &PlaceGeoQuery, pagination: &Pagination) -> Vec<IndexedPlace>;
});

// Every fragment only contains `?` placeholders and never any input.
// The parameters have to be bound in the order of their placeholders.

const SELECT_PLACES_WITHIN_LAT_RANGE: &str = "\
SELECT p.id AS id, p.name AS name, c.code AS category_code, c.label AS category_label, \
p.lat AS lat, p.lng AS lng, distance_m(?, ?, p.lat, p.lng) AS distance, \
s.avg_overall AS avg_overall, COALESCE(s.review_count, 0) AS review_count, \
p.created_at AS created_at \
FROM places p \
JOIN categories c ON c.id = p.category_id \
LEFT JOIN place_stats s ON s.place_id = p.id \
WHERE p.lat BETWEEN ? AND ?";

const FILTER_LNG_RANGE: &str = " AND p.lng BETWEEN ? AND ?";

const FILTER_LNG_RANGE_ACROSS_ANTIMERIDIAN: &str = " AND (p.lng >= ? OR p.lng <= ?)";

const FILTER_WITHIN_RADIUS: &str = " AND distance_m(?, ?, p.lat, p.lng) <= ?";

const FILTER_CATEGORY: &str = " AND c.code = ?";

const FILTER_TEXT_TERM: &str = " AND p.search_text LIKE ? ESCAPE '\\'";

const FILTER_FEATURE: &str = " AND p.id IN (\
SELECT pf.place_id FROM place_features pf \
JOIN features f ON f.id = pf.feature_id \
WHERE f.code = ? AND pf.value > 0)";

const ORDER_BY_DISTANCE: &str = " ORDER BY distance ASC, p.id ASC";

const ORDER_BY_SCORE: &str =
    " ORDER BY (s.avg_overall IS NULL) ASC, s.avg_overall DESC, distance ASC, p.id ASC";

const ORDER_BY_REVIEW_COUNT: &str = " ORDER BY review_count DESC, distance ASC, p.id ASC";

const ORDER_BY_NEWEST: &str = " ORDER BY p.created_at DESC, distance ASC, p.id ASC";

const LIMIT_OFFSET: &str = " LIMIT ? OFFSET ?";

type PlaceQuery = BoxedSqlQuery<'static, Sqlite, diesel::query_builder::SqlQuery>;

fn escape_like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn order_by(sort: PlaceSortKey) -> &'static str {
    match sort {
        PlaceSortKey::Distance => ORDER_BY_DISTANCE,
        PlaceSortKey::Score => ORDER_BY_SCORE,
        PlaceSortKey::ReviewCount => ORDER_BY_REVIEW_COUNT,
        PlaceSortKey::Newest => ORDER_BY_NEWEST,
    }
}

fn build_query(query: &PlaceGeoQuery, pagination: &Pagination) -> PlaceQuery {
    let PlaceGeoQuery {
        center,
        radius,
        category,
        text_terms,
        feature_codes,
        sort,
    } = query;
    let bbox = query.bbox();
    let (sw, ne) = (bbox.south_west(), bbox.north_east());

    let mut q = diesel::sql_query(SELECT_PLACES_WITHIN_LAT_RANGE)
        .into_boxed::<Sqlite>()
        .bind::<Double, _>(center.lat())
        .bind::<Double, _>(center.lng())
        .bind::<Double, _>(sw.lat())
        .bind::<Double, _>(ne.lat());

    if bbox.spans_all_longitudes() {
        // Only the exact distance check applies
    } else if bbox.wraps_antimeridian() {
        q = q
            .sql(FILTER_LNG_RANGE_ACROSS_ANTIMERIDIAN)
            .bind::<Double, _>(sw.lng())
            .bind::<Double, _>(ne.lng());
    } else {
        q = q
            .sql(FILTER_LNG_RANGE)
            .bind::<Double, _>(sw.lng())
            .bind::<Double, _>(ne.lng());
    }

    q = q
        .sql(FILTER_WITHIN_RADIUS)
        .bind::<Double, _>(center.lat())
        .bind::<Double, _>(center.lng())
        .bind::<Double, _>(radius.to_meters());

    if let Some(category) = category {
        q = q.sql(FILTER_CATEGORY).bind::<Text, _>(category.clone());
    }

    for term in text_terms {
        q = q
            .sql(FILTER_TEXT_TERM)
            .bind::<Text, _>(escape_like_pattern(term));
    }

    for code in feature_codes {
        q = q.sql(FILTER_FEATURE).bind::<Text, _>(code.clone());
    }

    let offset = pagination.offset.unwrap_or(0);
    // A negative limit means "no limit" for SQLite
    let limit = pagination
        .limit
        .and_then(|limit| i64::try_from(limit).ok())
        .unwrap_or(-1);
    q.sql(order_by(*sort))
        .sql(LIMIT_OFFSET)
        .bind::<BigInt, _>(limit)
        .bind::<BigInt, _>(i64::try_from(offset).unwrap_or(i64::MAX))
}

fn load_indexed_place(row: models::IndexedPlaceRow) -> Result<IndexedPlace> {
    let models::IndexedPlaceRow {
        id,
        name,
        category_code,
        category_label,
        lat,
        lng,
        distance,
        avg_overall,
        review_count,
        created_at,
    } = row;
    let pos = MapPoint::try_from_lat_lng_deg(lat, lng).map_err(anyhow::Error::from)?;
    Ok(IndexedPlace {
        id: id.into(),
        name,
        category_code,
        category_label,
        pos,
        distance: Distance::from_meters(distance),
        avg_overall: avg_overall.map(AvgRatingValue::new),
        review_count: u64::try_from(review_count).unwrap_or_default(),
        created_at: load_timestamp(created_at),
    })
}

fn query_places_within(
    conn: &mut SqliteConnection,
    query: &PlaceGeoQuery,
    pagination: &Pagination,
) -> Result<Vec<IndexedPlace>> {
    if pagination.limit == Some(0) {
        return Ok(vec![]);
    }
    build_query(query, pagination)
        .load::<models::IndexedPlaceRow>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_indexed_place)
        .collect()
}
