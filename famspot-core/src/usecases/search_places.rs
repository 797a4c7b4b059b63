use std::collections::HashMap;

use super::prelude::*;
use crate::util::{
    cursor::{decode_cursor, split_page},
    validate::{non_blank, split_codes, split_text_terms, ValidationError},
};

/// Unvalidated search parameters as received from a client.
#[rustfmt::skip]
#[derive(Debug, Clone, Default)]
pub struct SearchPlacesParams {
    pub lat      : Option<String>,
    pub lng      : Option<String>,
    pub radius_m : Option<String>,
    pub limit    : Option<String>,
    pub cursor   : Option<String>,
    pub sort     : Option<String>,
    pub q        : Option<String>,
    pub category : Option<String>,
    pub features : Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    pub default_radius_m: f64,
    pub max_radius_m: f64,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            default_radius_m: 3_000.0,
            max_radius_m: 30_000.0,
            default_limit: 20,
            max_limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: PlaceGeoQuery,
    pub offset: u64,
    pub limit: u64,
}

fn parse_number<T: std::str::FromStr>(
    field: &str,
    raw: Option<&str>,
    what: &str,
) -> std::result::Result<Option<T>, ValidationError> {
    non_blank(raw)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| ValidationError::field(field, format!("must be {what}")))
        })
        .transpose()
}

fn required<T>(field: &str, value: Option<T>) -> std::result::Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::field(field, "is required"))
}

/// Validates raw search parameters.
///
/// Numbers are parsed first, then checked against their ranges
/// and finally the sort key is checked. The first failure aborts
/// the validation.
pub fn parse_search_request(
    params: &SearchPlacesParams,
    limits: &SearchLimits,
) -> Result<SearchRequest> {
    let lat = required("lat", parse_number::<f64>("lat", params.lat.as_deref(), "a number")?)?;
    let lng = required("lng", parse_number::<f64>("lng", params.lng.as_deref(), "a number")?)?;
    let radius_m =
        parse_number::<f64>("radius_m", params.radius_m.as_deref(), "a number")?
            .unwrap_or(limits.default_radius_m);
    let limit = parse_number::<i64>("limit", params.limit.as_deref(), "an integer")?
        .unwrap_or(limits.default_limit as i64);

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::field("lat", "must be between -90 and 90").into());
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::field("lng", "must be between -180 and 180").into());
    }
    if !(radius_m > 0.0 && radius_m <= limits.max_radius_m) {
        return Err(ValidationError::field(
            "radius_m",
            format!("must be greater than 0 and at most {}", limits.max_radius_m),
        )
        .into());
    }
    if !(1..=limits.max_limit as i64).contains(&limit) {
        return Err(ValidationError::field(
            "limit",
            format!("must be between 1 and {}", limits.max_limit),
        )
        .into());
    }

    let sort = match non_blank(params.sort.as_deref()) {
        Some(sort) => sort.parse::<PlaceSortKey>().map_err(|()| {
            ValidationError::field("sort", "must be one of distance, score, reviews, new")
        })?,
        None => Default::default(),
    };

    let center = MapPoint::from_lat_lng_deg(lat, lng);
    let query = PlaceGeoQuery {
        category: non_blank(params.category.as_deref()).map(ToOwned::to_owned),
        text_terms: split_text_terms(params.q.as_deref()),
        feature_codes: split_codes(&params.features),
        sort,
        ..PlaceGeoQuery::new(center, Distance::from_meters(radius_m))
    };
    Ok(SearchRequest {
        query,
        offset: decode_cursor(params.cursor.as_deref()),
        limit: limit as u64,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearchItem {
    pub place: IndexedPlace,
    /// Codes of all present features
    pub features_summary: Vec<String>,
    pub thumbnail: Option<Photo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub items: Vec<PlaceSearchItem>,
    pub next_cursor: Option<String>,
}

pub fn search_places<R>(repo: &R, req: &SearchRequest) -> Result<SearchResult>
where
    R: PlaceGeoIndex + PlaceRepo + PhotoRepo,
{
    let pagination = Pagination {
        offset: Some(req.offset),
        limit: Some(req.limit + 1),
    };
    let places = repo.query_places_within(&req.query, &pagination)?;
    let (places, next_cursor) = split_page(places, req.offset, req.limit);

    let place_ids: Vec<_> = places.iter().map(|p| p.id.as_str()).collect();
    let mut features_by_place: HashMap<Id, Vec<String>> = HashMap::new();
    for (place_id, code) in repo.load_present_feature_codes_of_places(&place_ids)? {
        features_by_place.entry(place_id).or_default().push(code);
    }
    let mut thumbnails: HashMap<Id, Photo> = repo
        .load_latest_photo_of_places(&place_ids)?
        .into_iter()
        .filter_map(|photo| photo.place_id.clone().map(|place_id| (place_id, photo)))
        .collect();

    let items = places
        .into_iter()
        .map(|place| PlaceSearchItem {
            features_summary: features_by_place.remove(&place.id).unwrap_or_default(),
            thumbnail: thumbnails.remove(&place.id),
            place,
        })
        .collect();
    Ok(SearchResult { items, next_cursor })
}

#[cfg(test)]
mod tests {
    use super::super::tests::MockDb;
    use super::*;
    use crate::util::cursor::encode_cursor;

    fn params(lat: &str, lng: &str) -> SearchPlacesParams {
        SearchPlacesParams {
            lat: Some(lat.into()),
            lng: Some(lng.into()),
            ..Default::default()
        }
    }

    fn invalid_field(res: Result<SearchRequest>) -> String {
        match res {
            Err(Error::Validation(err)) => err.fields().keys().next().unwrap().clone(),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let req = parse_search_request(&params("35.0", "139.0"), &Default::default()).unwrap();
        assert_eq!(3_000.0, req.query.radius.to_meters());
        assert_eq!(20, req.limit);
        assert_eq!(0, req.offset);
        assert_eq!(PlaceSortKey::Distance, req.query.sort);
        assert!(req.query.category.is_none());
        assert!(req.query.text_terms.is_empty());
        assert!(req.query.feature_codes.is_empty());
    }

    #[test]
    fn all_parameters() {
        let p = SearchPlacesParams {
            radius_m: Some("1500".into()),
            limit: Some("50".into()),
            cursor: Some(encode_cursor(40)),
            sort: Some("review_count".into()),
            q: Some(" Big  Park ".into()),
            category: Some("park".into()),
            features: vec!["diaper_table,stroller_ok".into(), "kids_menu".into()],
            ..params("35.0", "139.0")
        };
        let req = parse_search_request(&p, &Default::default()).unwrap();
        assert_eq!(1_500.0, req.query.radius.to_meters());
        assert_eq!(50, req.limit);
        assert_eq!(40, req.offset);
        assert_eq!(PlaceSortKey::ReviewCount, req.query.sort);
        assert_eq!(Some("park"), req.query.category.as_deref());
        assert_eq!(vec!["big", "park"], req.query.text_terms);
        assert_eq!(
            vec!["diaper_table", "stroller_ok", "kids_menu"],
            req.query.feature_codes
        );
    }

    #[test]
    fn missing_or_malformed_coordinates() {
        let limits = SearchLimits::default();
        let missing_lat = SearchPlacesParams {
            lat: None,
            ..params("", "139.0")
        };
        assert_eq!("lat", invalid_field(parse_search_request(&missing_lat, &limits)));
        assert_eq!("lat", invalid_field(parse_search_request(&params("", "139"), &limits)));
        assert_eq!("lng", invalid_field(parse_search_request(&params("35", "east"), &limits)));
    }

    #[test]
    fn ranges_are_checked_after_parsing() {
        let limits = SearchLimits::default();
        assert_eq!("lat", invalid_field(parse_search_request(&params("90.1", "0"), &limits)));
        assert_eq!("lng", invalid_field(parse_search_request(&params("0", "-180.5"), &limits)));
        assert_eq!("lat", invalid_field(parse_search_request(&params("NaN", "0"), &limits)));

        // A parse error of the limit is reported before
        // the range error of the latitude
        let p = SearchPlacesParams {
            limit: Some("ten".into()),
            ..params("91", "0")
        };
        assert_eq!("limit", invalid_field(parse_search_request(&p, &limits)));

        for radius in ["0", "-1", "30000.1", "inf"] {
            let p = SearchPlacesParams {
                radius_m: Some(radius.into()),
                ..params("35", "139")
            };
            assert_eq!("radius_m", invalid_field(parse_search_request(&p, &limits)));
        }
        let p = SearchPlacesParams {
            radius_m: Some("30000".into()),
            ..params("35", "139")
        };
        assert!(parse_search_request(&p, &limits).is_ok());

        for limit in ["0", "51", "-3"] {
            let p = SearchPlacesParams {
                limit: Some(limit.into()),
                ..params("35", "139")
            };
            assert_eq!("limit", invalid_field(parse_search_request(&p, &limits)));
        }
    }

    #[test]
    fn sort_key_is_checked_last() {
        let limits = SearchLimits::default();
        let p = SearchPlacesParams {
            sort: Some("popular".into()),
            ..params("35", "139")
        };
        assert_eq!("sort", invalid_field(parse_search_request(&p, &limits)));

        let p = SearchPlacesParams {
            sort: Some("popular".into()),
            ..params("95", "139")
        };
        assert_eq!("lat", invalid_field(parse_search_request(&p, &limits)));
    }

    #[test]
    fn invalid_cursor_starts_over() {
        let p = SearchPlacesParams {
            cursor: Some("garbage".into()),
            ..params("35", "139")
        };
        let req = parse_search_request(&p, &Default::default()).unwrap();
        assert_eq!(0, req.offset);
    }

    #[test]
    fn exclude_places_outside_of_radius() {
        let db = MockDb::default();
        db.add_category("park");
        let near = db.add_place_at("near", "park", 35.0, 139.0 + 0.005);
        // ~1500 m to the east
        db.add_place_at("far", "park", 35.0, 139.0 + 0.0165);
        let p = SearchPlacesParams {
            radius_m: Some("1000".into()),
            ..params("35.0", "139.0")
        };
        let req = parse_search_request(&p, &Default::default()).unwrap();
        let res = search_places(&db, &req).unwrap();
        assert_eq!(1, res.items.len());
        assert_eq!(near, res.items[0].place.id);
        assert!(res.items[0].place.distance.to_meters() <= 1_000.0);
        assert!(res.next_cursor.is_none());
    }

    #[test]
    fn paginate_with_look_ahead() {
        let db = MockDb::default();
        db.add_category("park");
        for i in 0..5 {
            db.add_place_at(&format!("p{i}"), "park", 35.0, 139.0 + 0.001 * f64::from(i));
        }
        let mut p = SearchPlacesParams {
            limit: Some("2".into()),
            ..params("35.0", "139.0")
        };
        let mut pages = vec![];
        loop {
            let req = parse_search_request(&p, &Default::default()).unwrap();
            let res = search_places(&db, &req).unwrap();
            pages.push(
                res.items
                    .into_iter()
                    .map(|item| item.place.name)
                    .collect::<Vec<_>>(),
            );
            match res.next_cursor {
                Some(cursor) => p.cursor = Some(cursor),
                None => break,
            }
        }
        assert_eq!(
            vec![vec!["p0", "p1"], vec!["p2", "p3"], vec!["p4"]],
            pages
        );
    }

    #[test]
    fn enrich_items_with_features_and_thumbnails() {
        let db = MockDb::default();
        db.add_category("park");
        let place_id = db.add_place_at("p", "park", 35.0, 139.0);
        db.add_feature("stroller_ok");
        db.add_feature("diaper_table");
        db.add_feature("kids_menu");
        db.set_place_feature(&place_id, "stroller_ok", Some(1));
        db.set_place_feature(&place_id, "diaper_table", Some(2));
        db.set_place_feature(&place_id, "kids_menu", Some(0));
        let older = db.add_place_photo(&place_id, Timestamp::from_secs(100));
        let newer = db.add_place_photo(&place_id, Timestamp::from_secs(200));
        let req = parse_search_request(&params("35.0", "139.0"), &Default::default()).unwrap();
        let res = search_places(&db, &req).unwrap();
        let item = &res.items[0];
        assert_eq!(vec!["diaper_table", "stroller_ok"], item.features_summary);
        assert_eq!(Some(&newer), item.thumbnail.as_ref().map(|p| &p.id));
        assert_ne!(Some(&older), item.thumbnail.as_ref().map(|p| &p.id));
    }
}
