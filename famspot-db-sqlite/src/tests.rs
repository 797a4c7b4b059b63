use famspot_core::{db::*, entities::*, repositories::*, usecases};

use super::*;

// 1° of latitude on the sphere used for distance calculations
const METERS_PER_DEG_LAT: f64 = 111_198.6;

fn establish_connections() -> Connections {
    // A single connection, otherwise every connection would
    // open its own in-memory database.
    let connections = Connections::init(":memory:", 1, DEFAULT_BUSY_TIMEOUT).unwrap();
    run_embedded_database_migrations(connections.exclusive().unwrap()).unwrap();
    connections
}

fn new_place(db: &DbReadWrite, name: &str, category_code: &str, lat: f64, lng: f64) -> Place {
    let category = db.get_category_by_code(category_code).unwrap();
    let now = Timestamp::now();
    let place = Place {
        id: Id::new(),
        name: name.into(),
        kana: None,
        category_id: category.id,
        description: None,
        address: None,
        phone: None,
        website_url: None,
        price_range: None,
        opening_hours: None,
        pos: MapPoint::from_lat_lng_deg(lat, lng),
        provenance: Default::default(),
        created_at: now,
        updated_at: now,
    };
    db.create_or_update_place(&place).unwrap();
    place
}

fn north_of(lat: f64, meters: f64) -> f64 {
    lat + meters / METERS_PER_DEG_LAT
}

fn query_around(lat: f64, lng: f64, radius_m: f64) -> PlaceGeoQuery {
    PlaceGeoQuery::new(
        MapPoint::from_lat_lng_deg(lat, lng),
        Distance::from_meters(radius_m),
    )
}

fn review_photo(uploaded_by: &str) -> Photo {
    Photo {
        id: Id::new(),
        purpose: PhotoPurpose::ReviewPhoto,
        storage_path: "reviews/photo.jpg".into(),
        place_id: None,
        review_id: None,
        uploaded_by: uploaded_by.into(),
        mime_type: Some("image/jpeg".into()),
        width: Some(1024),
        height: Some(768),
        file_size: Some(123_456),
        created_at: Timestamp::now(),
    }
}

fn public_review(place_id: &Id, author: &str, overall: u8) -> Review {
    let now = Timestamp::now();
    Review {
        id: Id::new(),
        place_id: place_id.clone(),
        author_id: author.into(),
        overall: RatingValue::new(overall),
        age_band_id: None,
        stay_minutes: Some(60),
        revisit_intent: None,
        text: "Nice".into(),
        status: ReviewStatus::Public,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn reference_data_is_seeded() {
    let connections = establish_connections();
    let db = connections.shared().unwrap();
    let categories = db.all_categories().unwrap();
    assert_eq!(
        vec!["park", "indoor_kids", "restaurant"],
        categories.iter().map(|c| c.code.as_str()).collect::<Vec<_>>()
    );
    let axes = db.all_review_axes().unwrap();
    assert_eq!(5, axes.len());
    assert_eq!("cleanliness", axes[0].code);
    assert_eq!(3, db.all_age_bands().unwrap().len());
    let features = db.all_features().unwrap();
    assert_eq!(Some("access"), features[0].group.as_deref());
    assert_eq!(
        2,
        db.features_by_codes(&["kids_menu", "elevator", "unknown"])
            .unwrap()
            .len()
    );
}

#[test]
fn create_update_and_get_place() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let mut place = new_place(&db, "Sakura Park", "park", 35.0, 139.0);
    assert_eq!(place, db.get_place(place.id.as_str()).unwrap());

    place.description = Some("Big slides".into());
    place.provenance.external_id = Some("ext-1".into());
    place.provenance.data_source = DataSource::External;
    place.provenance.synced_at = Some(Timestamp::from_millis(1_700_000_000_000));
    db.create_or_update_place(&place).unwrap();
    assert_eq!(1, db.count_places().unwrap());
    assert_eq!(place, db.get_place_by_external_id("ext-1").unwrap());

    place.description = None;
    db.create_or_update_place(&place).unwrap();
    assert_eq!(None, db.get_place(place.id.as_str()).unwrap().description);

    assert!(matches!(db.get_place("unknown"), Err(Error::NotFound)));
}

#[test]
fn only_present_features_are_loaded() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let place = new_place(&db, "Cafe", "restaurant", 35.0, 139.0);
    let features = db
        .features_by_codes(&["kids_menu", "elevator", "nursing_room"])
        .unwrap();
    let feature = |code: &str| features.iter().find(|f| f.code == code).unwrap().id.clone();
    db.replace_place_features(
        place.id.as_str(),
        &[
            PlaceFeature {
                feature_id: feature("kids_menu"),
                value: Some(2),
                detail: Some("Small portions".into()),
            },
            PlaceFeature {
                feature_id: feature("elevator"),
                value: Some(0),
                detail: None,
            },
            PlaceFeature {
                feature_id: feature("nursing_room"),
                value: None,
                detail: None,
            },
        ],
    )
    .unwrap();
    let present = db.load_present_place_features(place.id.as_str()).unwrap();
    assert_eq!(1, present.len());
    assert_eq!("kids_menu", present[0].feature.code);
    assert_eq!(Some("Small portions"), present[0].detail.as_deref());
    assert_eq!(
        vec![(place.id.clone(), "kids_menu".to_string())],
        db.load_present_feature_codes_of_places(&[place.id.as_str()])
            .unwrap()
    );

    // Replace all features
    db.replace_place_features(place.id.as_str(), &[]).unwrap();
    assert!(db
        .load_present_place_features(place.id.as_str())
        .unwrap()
        .is_empty());
}

#[test]
fn search_within_radius() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let near = new_place(&db, "Near", "park", north_of(35.0, 500.0), 139.0);
    let far = new_place(&db, "Far", "park", north_of(35.0, 1_500.0), 139.0);
    let _very_far = new_place(&db, "Very far", "park", 36.0, 139.0);

    let hits = db
        .query_places_within(&query_around(35.0, 139.0, 1_000.0), &Pagination::default())
        .unwrap();
    assert_eq!(vec![near.id.clone()], hits.iter().map(|p| p.id.clone()).collect::<Vec<_>>());
    assert!((hits[0].distance.to_meters() - 500.0).abs() < 1.0);
    assert_eq!("park", hits[0].category_code);
    assert_eq!(None, hits[0].avg_overall);
    assert_eq!(0, hits[0].review_count);

    let hits = db
        .query_places_within(&query_around(35.0, 139.0, 2_000.0), &Pagination::default())
        .unwrap();
    assert_eq!(
        vec![near.id, far.id],
        hits.iter().map(|p| p.id.clone()).collect::<Vec<_>>()
    );
    assert!(hits.iter().all(|p| p.distance.to_meters() <= 2_000.0));
}

#[test]
fn search_within_radius_at_high_latitude() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    // Near the eastern edge of the circle, beyond center.lng + δ/cos(φ)
    let edge = new_place(&db, "Edge", "park", 89.58, 32.0);
    let _outside = new_place(&db, "Outside", "park", 89.58, 40.0);
    let hits = db
        .query_places_within(&query_around(89.5, 0.0, 30_000.0), &Pagination::default())
        .unwrap();
    assert_eq!(vec![edge.id], hits.iter().map(|p| p.id.clone()).collect::<Vec<_>>());
    assert!(hits[0].distance.to_meters() <= 30_000.0);
}

#[test]
fn search_across_the_antimeridian() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let west = new_place(&db, "West", "park", 0.0, 179.995);
    let east = new_place(&db, "East", "park", 0.0, -179.995);
    let _elsewhere = new_place(&db, "Elsewhere", "park", 0.0, 0.0);
    let hits = db
        .query_places_within(&query_around(0.0, 179.999, 5_000.0), &Pagination::default())
        .unwrap();
    assert_eq!(2, hits.len());
    assert!(hits.iter().any(|p| p.id == west.id));
    assert!(hits.iter().any(|p| p.id == east.id));
}

#[test]
fn search_with_conjunctive_filters() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let mut park = new_place(&db, "Sakura Park", "park", 35.0, 139.0);
    park.description = Some("100% fun for kids_all ages".into());
    db.create_or_update_place(&park).unwrap();
    let cafe = new_place(&db, "Sakura Cafe", "restaurant", 35.001, 139.0);
    let features = db.features_by_codes(&["kids_menu", "elevator"]).unwrap();
    let feature_id = |code: &str| features.iter().find(|f| f.code == code).unwrap().id.clone();
    db.replace_place_features(
        cafe.id.as_str(),
        &[
            PlaceFeature {
                feature_id: feature_id("kids_menu"),
                value: Some(1),
                detail: None,
            },
            PlaceFeature {
                feature_id: feature_id("elevator"),
                value: Some(0),
                detail: None,
            },
        ],
    )
    .unwrap();

    let ids = |query: &PlaceGeoQuery| {
        db.query_places_within(query, &Pagination::default())
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<_>>()
    };

    let mut query = query_around(35.0, 139.0, 1_000.0);
    query.text_terms = vec!["sakura".into()];
    assert_eq!(vec![park.id.clone(), cafe.id.clone()], ids(&query));

    query.category = Some("restaurant".into());
    assert_eq!(vec![cafe.id.clone()], ids(&query));

    query.category = None;
    query.feature_codes = vec!["kids_menu".into()];
    assert_eq!(vec![cafe.id.clone()], ids(&query));

    // Features with a value of 0 are not present
    query.feature_codes = vec!["kids_menu".into(), "elevator".into()];
    assert!(ids(&query).is_empty());

    // Wildcards in search terms are matched literally
    let mut query = query_around(35.0, 139.0, 1_000.0);
    query.text_terms = vec!["100%".into(), "kids_all".into()];
    assert_eq!(vec![park.id.clone()], ids(&query));
    query.text_terms = vec!["10_%".into()];
    assert!(ids(&query).is_empty());
}

#[test]
fn sort_by_score_with_unrated_places_last() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let unrated = new_place(&db, "Unrated", "park", 35.0, 139.0);
    let good = new_place(&db, "Good", "park", north_of(35.0, 300.0), 139.0);
    let better = new_place(&db, "Better", "park", north_of(35.0, 600.0), 139.0);
    for (place, overall, count) in [(&good, 4.0, 3), (&better, 4.5, 1)] {
        db.upsert_place_stats(&PlaceStats {
            place_id: place.id.clone(),
            avg_overall: Some(AvgRatingValue::new(overall)),
            review_count: count,
            photo_count: 0,
            last_reviewed_at: Timestamp::now(),
        })
        .unwrap();
    }

    let mut query = query_around(35.0, 139.0, 1_000.0);
    let ids = |query: &PlaceGeoQuery| {
        db.query_places_within(query, &Pagination::default())
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(
        vec![unrated.id.clone(), good.id.clone(), better.id.clone()],
        ids(&query)
    );
    query.sort = PlaceSortKey::Score;
    assert_eq!(
        vec![better.id.clone(), good.id.clone(), unrated.id.clone()],
        ids(&query)
    );
    query.sort = PlaceSortKey::ReviewCount;
    assert_eq!(
        vec![good.id.clone(), better.id.clone(), unrated.id.clone()],
        ids(&query)
    );
}

#[test]
fn paginated_search_results_are_complete() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    // Several places share the same position to exercise the tie-break
    for i in 0..23 {
        new_place(
            &db,
            &format!("Place {i}"),
            "park",
            north_of(35.0, f64::from(i % 5) * 100.0),
            139.0,
        );
    }
    for sort in [
        PlaceSortKey::Distance,
        PlaceSortKey::Score,
        PlaceSortKey::ReviewCount,
        PlaceSortKey::Newest,
    ] {
        let mut query = query_around(35.0, 139.0, 1_000.0);
        query.sort = sort;
        let all = db
            .query_places_within(&query, &Pagination::default())
            .unwrap();
        assert_eq!(23, all.len());
        let mut paged = vec![];
        let mut offset = 0;
        loop {
            let page = db
                .query_places_within(
                    &query,
                    &Pagination {
                        offset: Some(offset),
                        limit: Some(5),
                    },
                )
                .unwrap();
            if page.is_empty() {
                break;
            }
            offset += page.len() as u64;
            paged.extend(page);
        }
        assert_eq!(all, paged);
    }
}

#[test]
fn refreshing_stats_is_idempotent() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let place = new_place(&db, "Park", "park", 35.0, 139.0);
    for overall in [5, 4, 4] {
        db.create_review(&public_review(&place.id, "alice", overall))
            .unwrap();
    }
    let mut hidden = public_review(&place.id, "bob", 1);
    hidden.status = ReviewStatus::Hidden;
    db.create_review(&hidden).unwrap();

    let first = usecases::refresh_place_stats(&db, place.id.as_str()).unwrap();
    assert_eq!(3, first.review_count);
    assert_eq!(Some(AvgRatingValue::new(4.33)), first.avg_overall);
    let second = usecases::refresh_place_stats(&db, place.id.as_str()).unwrap();
    assert_eq!(first, second);
    assert_eq!(Some(first), db.get_place_stats(place.id.as_str()).unwrap());
}

#[test]
fn lock_only_attachable_review_photos() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let place = new_place(&db, "Park", "park", 35.0, 139.0);
    let own = review_photo("alice");
    let foreign = review_photo("bob");
    let mut place_photo = review_photo("alice");
    place_photo.purpose = PhotoPurpose::PlacePhoto;
    for photo in [&own, &foreign, &place_photo] {
        db.create_photo(photo).unwrap();
    }
    let ids = [own.id.as_str(), foreign.id.as_str(), place_photo.id.as_str()];
    let locked = db.lock_attachable_review_photos("alice", &ids).unwrap();
    assert_eq!(vec![own.clone()], locked);

    let review = public_review(&place.id, "alice", 5);
    db.create_review(&review).unwrap();
    assert_eq!(
        1,
        db.attach_photos_to_review(&[own.id.as_str()], review.id.as_str(), place.id.as_str())
            .unwrap()
    );
    // Already attached
    assert!(db
        .lock_attachable_review_photos("alice", &[own.id.as_str()])
        .unwrap()
        .is_empty());
    assert_eq!(
        0,
        db.attach_photos_to_review(&[own.id.as_str()], review.id.as_str(), place.id.as_str())
            .unwrap()
    );
    let attached = db.get_photo(own.id.as_str()).unwrap();
    assert_eq!(Some(&review.id), attached.review_id.as_ref());
    assert_eq!(Some(&place.id), attached.place_id.as_ref());
    assert_eq!(1, db.count_place_photos(place.id.as_str()).unwrap());
    assert_eq!(
        vec![attached],
        db.load_photos_of_reviews(&[review.id.as_str()]).unwrap()
    );
}

#[test]
fn load_only_the_latest_photo_of_each_place() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let park = new_place(&db, "Park", "park", 35.0, 139.0);
    let cafe = new_place(&db, "Cafe", "restaurant", 35.0, 139.001);
    let without_photos = new_place(&db, "Empty", "park", 35.0, 139.002);
    let photo_of = |place: &Place, created_at: i64| {
        let mut photo = review_photo("alice");
        photo.purpose = PhotoPurpose::PlacePhoto;
        photo.place_id = Some(place.id.clone());
        photo.created_at = Timestamp::from_millis(created_at);
        db.create_photo(&photo).unwrap();
        photo
    };
    let _older = photo_of(&park, 1_000);
    let latest_of_park = photo_of(&park, 3_000);
    let _oldest = photo_of(&park, 500);
    let only_of_cafe = photo_of(&cafe, 2_000);

    let mut latest = db
        .load_latest_photo_of_places(&[
            park.id.as_str(),
            cafe.id.as_str(),
            without_photos.id.as_str(),
        ])
        .unwrap();
    latest.sort_by_key(|photo| photo.created_at);
    assert_eq!(vec![only_of_cafe, latest_of_park.clone()], latest);

    assert_eq!(
        vec![latest_of_park],
        db.load_latest_photo_of_places(&[park.id.as_str()]).unwrap()
    );
    assert!(db.load_latest_photo_of_places(&[]).unwrap().is_empty());
}

#[test]
fn list_public_reviews_with_photos() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    let place = new_place(&db, "Park", "park", 35.0, 139.0);
    let mut first = public_review(&place.id, "alice", 3);
    first.created_at = Timestamp::from_millis(1_000);
    let mut second = public_review(&place.id, "bob", 5);
    second.created_at = Timestamp::from_millis(2_000);
    let mut pending = public_review(&place.id, "carol", 4);
    pending.status = ReviewStatus::Pending;
    for review in [&first, &second, &pending] {
        db.create_review(review).unwrap();
    }
    let photo = review_photo("alice");
    db.create_photo(&photo).unwrap();
    db.attach_photos_to_review(&[photo.id.as_str()], first.id.as_str(), place.id.as_str())
        .unwrap();

    let ids = |params: ReviewListParams| {
        db.load_public_reviews_of_place(place.id.as_str(), &params, &Pagination::default())
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(
        vec![second.id.clone(), first.id.clone()],
        ids(ReviewListParams::default())
    );
    assert_eq!(
        vec![first.id.clone()],
        ids(ReviewListParams {
            with_photos_only: true,
            ..Default::default()
        })
    );
    let reviews = db
        .load_public_reviews_of_place(
            place.id.as_str(),
            &ReviewListParams::default(),
            &Pagination {
                offset: Some(1),
                limit: Some(1),
            },
        )
        .unwrap();
    assert_eq!(vec![first], reviews);
}

#[test]
fn rollback_transaction_on_error() {
    let connections = establish_connections();
    let place_id = {
        let db = connections.exclusive().unwrap();
        new_place(&db, "Park", "park", 35.0, 139.0).id
    };
    let result = connections
        .exclusive()
        .unwrap()
        .transaction(|conn| {
            conn.create_review(&public_review(&place_id, "alice", 4))?;
            Err::<(), _>(usecases::Error::Conflict)
        });
    assert!(matches!(result, Err(usecases::Error::Conflict)));
    assert_eq!(0, connections.shared().unwrap().count_reviews().unwrap());
}

#[test]
fn reject_writes_on_read_only_connections() {
    let connections = establish_connections();
    let db = connections.shared().unwrap();
    assert!(db
        .create_user(&User {
            id: "alice".into(),
            email: "alice@example.com".into(),
            nickname: None,
        })
        .is_err());
}

#[test]
fn get_users_by_ids() {
    let connections = establish_connections();
    let db = connections.exclusive().unwrap();
    for (id, nickname) in [("alice", Some("Ali")), ("bob", None)] {
        db.create_user(&User {
            id: id.into(),
            email: format!("{id}@example.com"),
            nickname: nickname.map(Into::into),
        })
        .unwrap();
    }
    assert_eq!(Some("Ali".into()), db.get_user("alice").unwrap().nickname);
    assert_eq!(2, db.get_users(&["alice", "bob", "carol"]).unwrap().len());
    assert!(matches!(
        db.create_user(&User {
            id: "alice2".into(),
            email: "alice@example.com".into(),
            nickname: None,
        }),
        Err(Error::AlreadyExists)
    ));
}
