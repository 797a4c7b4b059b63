use super::*;

impl_repo!(ReviewRepo {
    read fn count_reviews(&self) -> usize;
    read fn count_review_scores(&self) -> usize;
    read fn load_public_review_ratings(&self, place_id: &str) -> Vec<(RatingValue, Timestamp)>;
    read fn load_public_reviews_of_place(&self, place_id: &str, params: &ReviewListParams, pagination: &Pagination) -> Vec<Review>;
    read fn load_review_scores_with_axis_codes(&self, review_ids: &[&str]) -> Vec<(Id, String, RatingValue)>;
    write fn create_review(&self, review: &Review) -> ();
    write fn create_review_scores(&self, scores: &[ReviewScore]) -> ();
});

const PUBLIC_STATUS: &str = "public";

fn load_review(entity: models::ReviewEntity) -> Result<Review> {
    let models::ReviewEntity {
        id,
        place_id,
        user_id,
        overall,
        age_band_id,
        stay_minutes,
        revisit_intent,
        text,
        status,
        created_at,
        updated_at,
    } = entity;
    let status = status
        .parse::<ReviewStatus>()
        .map_err(|_| anyhow!("Invalid review status: {status}"))?;
    Ok(Review {
        id: id.into(),
        place_id: place_id.into(),
        author_id: user_id.into(),
        overall: load_rating_value(overall)?,
        age_band_id: age_band_id.map(Into::into),
        stay_minutes: stay_minutes.and_then(|m| u32::try_from(m).ok()),
        revisit_intent: revisit_intent.map(load_rating_value).transpose()?,
        text,
        status,
        created_at: load_timestamp(created_at),
        updated_at: load_timestamp(updated_at),
    })
}

fn create_review(conn: &mut SqliteConnection, review: &Review) -> Result<()> {
    let Review {
        id,
        place_id,
        author_id,
        overall,
        age_band_id,
        stay_minutes,
        revisit_intent,
        text,
        status,
        created_at,
        updated_at,
    } = review;
    let new_review = models::NewReview {
        id: id.as_str(),
        place_id: place_id.as_str(),
        user_id: author_id.as_str(),
        overall: i16::from(u8::from(*overall)),
        age_band_id: age_band_id.as_ref().map(Id::as_str),
        stay_minutes: stay_minutes.and_then(|m| i32::try_from(m).ok()),
        revisit_intent: revisit_intent.map(|v| i16::from(u8::from(v))),
        text,
        status: status.as_ref(),
        created_at: created_at.as_millis(),
        updated_at: updated_at.as_millis(),
    };
    diesel::insert_into(schema::reviews::table)
        .values(&new_review)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn create_review_scores(conn: &mut SqliteConnection, scores: &[ReviewScore]) -> Result<()> {
    if scores.is_empty() {
        return Ok(());
    }
    let new_scores: Vec<_> = scores
        .iter()
        .map(|score| models::NewReviewScore {
            review_id: score.review_id.as_str(),
            axis_id: score.axis_id.as_str(),
            score: i16::from(u8::from(score.score)),
        })
        .collect();
    diesel::insert_into(schema::review_scores::table)
        .values(&new_scores)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn count_reviews(conn: &mut SqliteConnection) -> Result<usize> {
    use schema::reviews::dsl;
    let count = dsl::reviews
        .select(diesel::dsl::count_star())
        .first::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count_rows(count))
}

fn count_review_scores(conn: &mut SqliteConnection) -> Result<usize> {
    use schema::review_scores::dsl;
    let count = dsl::review_scores
        .select(diesel::dsl::count_star())
        .first::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count_rows(count))
}

fn load_public_review_ratings(
    conn: &mut SqliteConnection,
    place_id: &str,
) -> Result<Vec<(RatingValue, Timestamp)>> {
    use schema::reviews::dsl;
    dsl::reviews
        .filter(dsl::place_id.eq(place_id))
        .filter(dsl::status.eq(PUBLIC_STATUS))
        .select((dsl::overall, dsl::created_at))
        .load::<(i16, i64)>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|(overall, created_at)| {
            load_rating_value(overall).map(|overall| (overall, load_timestamp(created_at)))
        })
        .collect()
}

fn load_public_reviews_of_place(
    conn: &mut SqliteConnection,
    place_id: &str,
    params: &ReviewListParams,
    pagination: &Pagination,
) -> Result<Vec<Review>> {
    use schema::{photos::dsl as p, reviews::dsl};
    let mut query = dsl::reviews
        .filter(dsl::place_id.eq(place_id))
        .filter(dsl::status.eq(PUBLIC_STATUS))
        .select(models::ReviewEntity::as_select())
        .into_boxed();
    if params.with_photos_only {
        query = query.filter(
            dsl::id.nullable().eq_any(
                p::photos
                    .select(p::review_id)
                    .filter(p::review_id.is_not_null()),
            ),
        );
    }
    query = match params.sort {
        ReviewSortKey::New => query.order_by((dsl::created_at.desc(), dsl::id.desc())),
        ReviewSortKey::Rating => query.order_by((
            dsl::overall.desc(),
            dsl::created_at.desc(),
            dsl::id.desc(),
        )),
    };
    if let Some(offset) = pagination.offset {
        query = query.offset(i64::try_from(offset).unwrap_or(i64::MAX));
    }
    if let Some(limit) = pagination.limit {
        query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    query
        .load::<models::ReviewEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_review)
        .collect()
}

fn load_review_scores_with_axis_codes(
    conn: &mut SqliteConnection,
    review_ids: &[&str],
) -> Result<Vec<(Id, String, RatingValue)>> {
    use schema::{review_axes::dsl as a, review_scores::dsl as s};
    if review_ids.is_empty() {
        return Ok(vec![]);
    }
    s::review_scores
        .inner_join(a::review_axes)
        .filter(s::review_id.eq_any(review_ids.iter().copied()))
        .order_by((s::review_id.asc(), a::sort.asc(), a::code.asc()))
        .select((s::review_id, a::code, s::score))
        .load::<(String, String, i16)>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|(review_id, code, score)| {
            load_rating_value(score).map(|score| (Id::from(review_id), code, score))
        })
        .collect()
}
