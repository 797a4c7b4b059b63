use super::prelude::*;

/// Computes the statistics of a place from its source data.
///
/// `last_reviewed_at` falls back to the previously stored value and
/// only to `now` if there is none. This keeps consecutive refreshes
/// without intermediate writes idempotent.
pub fn compute_place_stats(
    place_id: Id,
    public_ratings: &[(RatingValue, Timestamp)],
    photo_count: u64,
    previous: Option<&PlaceStats>,
    now: Timestamp,
) -> PlaceStats {
    let avg: AvgRatingValueBuilder = public_ratings.iter().map(|(value, _)| *value).collect();
    let review_count = avg.count();
    let last_reviewed_at = public_ratings
        .iter()
        .map(|(_, created_at)| *created_at)
        .max()
        .or_else(|| previous.map(|stats| stats.last_reviewed_at))
        .unwrap_or(now);
    PlaceStats {
        place_id,
        avg_overall: avg.build(),
        review_count,
        photo_count,
        last_reviewed_at,
    }
}

/// Recomputes and stores the statistics of a place.
///
/// Never increments counters. All values are recomputed from the
/// source rows, so concurrent refreshes converge.
pub fn refresh_place_stats<R>(repo: &R, place_id: &str) -> Result<PlaceStats>
where
    R: ReviewRepo + PhotoRepo + PlaceStatsRepo,
{
    let public_ratings = repo.load_public_review_ratings(place_id)?;
    let photo_count = repo.count_place_photos(place_id)?;
    let previous = repo.get_place_stats(place_id)?;
    let stats = compute_place_stats(
        place_id.into(),
        &public_ratings,
        photo_count,
        previous.as_ref(),
        Timestamp::now(),
    );
    repo.upsert_place_stats(&stats)?;
    log::debug!(
        "Refreshed statistics of place {place_id}: {} review(s), {} photo(s)",
        stats.review_count,
        stats.photo_count
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::super::tests::MockDb;
    use super::*;
    use famspot_entities::builders::*;

    fn rating(value: u8, secs: i64) -> (RatingValue, Timestamp) {
        (RatingValue::new(value), Timestamp::from_secs(secs))
    }

    #[test]
    fn compute_from_public_ratings() {
        let now = Timestamp::from_secs(1_000);
        let stats = compute_place_stats(
            "p".into(),
            &[rating(5, 10), rating(4, 30), rating(4, 20)],
            7,
            None,
            now,
        );
        assert_eq!(Some(4.33), stats.avg_overall.map(f64::from));
        assert_eq!(3, stats.review_count);
        assert_eq!(7, stats.photo_count);
        assert_eq!(Timestamp::from_secs(30), stats.last_reviewed_at);
    }

    #[test]
    fn compute_without_reviews() {
        let now = Timestamp::from_secs(1_000);
        let stats = compute_place_stats("p".into(), &[], 0, None, now);
        assert_eq!(None, stats.avg_overall);
        assert_eq!(0, stats.review_count);
        assert_eq!(now, stats.last_reviewed_at);

        let later = Timestamp::from_secs(2_000);
        let again = compute_place_stats("p".into(), &[], 0, Some(&stats), later);
        assert_eq!(stats, again);
    }

    #[test]
    fn refresh_is_idempotent() {
        let db = MockDb::default();
        db.add_category("park");
        let place_id = db.add_place_at("p", "park", 35.0, 139.0);
        db.reviews.borrow_mut().push(
            Review::build()
                .place_id(place_id.as_str())
                .overall(4)
                .created_at(Timestamp::from_secs(10))
                .finish(),
        );
        db.add_place_photo(&place_id, Timestamp::from_secs(11));

        let first = refresh_place_stats(&db, place_id.as_str()).unwrap();
        let second = refresh_place_stats(&db, place_id.as_str()).unwrap();
        assert_eq!(first, second);
        assert_eq!(1, db.place_stats.borrow().len());
        assert_eq!(Some(first), db.get_place_stats(place_id.as_str()).unwrap());
    }

    #[test]
    fn refresh_without_public_reviews_is_idempotent() {
        let db = MockDb::default();
        db.add_category("park");
        let place_id = db.add_place_at("p", "park", 35.0, 139.0);
        let first = refresh_place_stats(&db, place_id.as_str()).unwrap();
        let second = refresh_place_stats(&db, place_id.as_str()).unwrap();
        assert_eq!(first, second);
        assert_eq!(None, second.avg_overall);
    }

    #[test]
    fn only_public_reviews_are_counted() {
        let db = MockDb::default();
        db.add_category("park");
        let place_id = db.add_place_at("p", "park", 35.0, 139.0);
        for (overall, status) in [
            (5, ReviewStatus::Public),
            (1, ReviewStatus::Hidden),
            (2, ReviewStatus::Pending),
            (4, ReviewStatus::Public),
        ] {
            db.reviews.borrow_mut().push(
                Review::build()
                    .place_id(place_id.as_str())
                    .overall(overall)
                    .status(status)
                    .finish(),
            );
        }
        let stats = refresh_place_stats(&db, place_id.as_str()).unwrap();
        assert_eq!(2, stats.review_count);
        assert_eq!(Some(4.5), stats.avg_overall.map(f64::from));
    }
}
