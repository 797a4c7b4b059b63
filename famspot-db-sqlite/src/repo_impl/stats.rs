use super::*;

impl_repo!(PlaceStatsRepo {
    read fn get_place_stats(&self, place_id: &str) -> Option<PlaceStats>;
    write fn upsert_place_stats(&self, stats: &PlaceStats) -> ();
});

fn get_place_stats(conn: &mut SqliteConnection, place_id: &str) -> Result<Option<PlaceStats>> {
    use schema::place_stats::dsl;
    Ok(dsl::place_stats
        .filter(dsl::place_id.eq(place_id))
        .select(models::PlaceStatsEntity::as_select())
        .first::<models::PlaceStatsEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(
            |models::PlaceStatsEntity {
                 place_id,
                 avg_overall,
                 review_count,
                 photo_count,
                 last_reviewed_at,
             }| PlaceStats {
                place_id: place_id.into(),
                avg_overall: avg_overall.map(AvgRatingValue::new),
                review_count: u64::try_from(review_count).unwrap_or_default(),
                photo_count: u64::try_from(photo_count).unwrap_or_default(),
                last_reviewed_at: load_timestamp(last_reviewed_at),
            },
        ))
}

// All aggregates are overwritten at once. Concurrent refreshes
// converge because each one writes a complete recomputation.
fn upsert_place_stats(conn: &mut SqliteConnection, stats: &PlaceStats) -> Result<()> {
    use schema::place_stats::dsl;
    let PlaceStats {
        place_id,
        avg_overall,
        review_count,
        photo_count,
        last_reviewed_at,
    } = stats;
    let new_stats = models::NewPlaceStats {
        place_id: place_id.as_str(),
        avg_overall: avg_overall.map(f64::from),
        review_count: i64::try_from(*review_count).unwrap_or(i64::MAX),
        photo_count: i64::try_from(*photo_count).unwrap_or(i64::MAX),
        last_reviewed_at: last_reviewed_at.as_millis(),
    };
    diesel::insert_into(schema::place_stats::table)
        .values(&new_stats)
        .on_conflict(dsl::place_id)
        .do_update()
        .set(&new_stats)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}
