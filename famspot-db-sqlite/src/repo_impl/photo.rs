use super::*;

impl_repo!(PhotoRepo {
    read fn get_photo(&self, id: &str) -> Photo;
    read fn lock_attachable_review_photos(&self, uploaded_by: &str, ids: &[&str]) -> Vec<Photo>;
    read fn count_place_photos(&self, place_id: &str) -> u64;
    read fn count_photos(&self) -> usize;
    read fn load_recent_place_photos(&self, place_id: &str, limit: u64) -> Vec<Photo>;
    read fn load_latest_photo_of_places(&self, place_ids: &[&str]) -> Vec<Photo>;
    read fn load_photos_of_reviews(&self, review_ids: &[&str]) -> Vec<Photo>;
    write fn create_photo(&self, photo: &Photo) -> ();
    write fn attach_photos_to_review(&self, ids: &[&str], review_id: &str, place_id: &str) -> usize;
});

fn create_photo(conn: &mut SqliteConnection, photo: &Photo) -> Result<()> {
    let Photo {
        id,
        purpose,
        storage_path,
        place_id,
        review_id,
        uploaded_by,
        mime_type,
        width,
        height,
        file_size,
        created_at,
    } = photo;
    let new_photo = models::NewPhoto {
        id: id.as_str(),
        purpose: purpose.as_ref(),
        storage_path,
        place_id: place_id.as_ref().map(Id::as_str),
        review_id: review_id.as_ref().map(Id::as_str),
        uploaded_by: uploaded_by.as_str(),
        mime_type: mime_type.as_deref(),
        width: width.and_then(|w| i32::try_from(w).ok()),
        height: height.and_then(|h| i32::try_from(h).ok()),
        file_size: file_size.and_then(|s| i64::try_from(s).ok()),
        created_at: created_at.as_millis(),
    };
    diesel::insert_into(schema::photos::table)
        .values(&new_photo)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn get_photo(conn: &mut SqliteConnection, id: &str) -> Result<Photo> {
    use schema::photos::dsl;
    let entity = dsl::photos
        .filter(dsl::id.eq(id))
        .select(models::PhotoEntity::as_select())
        .first::<models::PhotoEntity>(conn)
        .map_err(from_diesel_err)?;
    load_photo(entity)
}

// The rows are protected from concurrent modifications by the
// enclosing immediate transaction that holds the write lock.
fn lock_attachable_review_photos(
    conn: &mut SqliteConnection,
    uploaded_by: &str,
    ids: &[&str],
) -> Result<Vec<Photo>> {
    use schema::photos::dsl;
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let entities = dsl::photos
        .filter(dsl::id.eq_any(ids.iter().copied()))
        .filter(dsl::uploaded_by.eq(uploaded_by))
        .filter(dsl::review_id.is_null())
        .filter(dsl::purpose.eq(PhotoPurpose::ReviewPhoto.as_ref()))
        .order_by(dsl::id.asc())
        .select(models::PhotoEntity::as_select())
        .load::<models::PhotoEntity>(conn)
        .map_err(from_diesel_err)?;
    load_photos(entities)
}

fn attach_photos_to_review(
    conn: &mut SqliteConnection,
    ids: &[&str],
    review_id: &str,
    place_id: &str,
) -> Result<usize> {
    use schema::photos::dsl;
    if ids.is_empty() {
        return Ok(0);
    }
    diesel::update(
        dsl::photos
            .filter(dsl::id.eq_any(ids.iter().copied()))
            .filter(dsl::review_id.is_null()),
    )
    .set((dsl::review_id.eq(review_id), dsl::place_id.eq(place_id)))
    .execute(conn)
    .map_err(from_diesel_err)
}

fn count_place_photos(conn: &mut SqliteConnection, place_id: &str) -> Result<u64> {
    use schema::{photos::dsl, reviews::dsl as r};
    let reviews_of_place = r::reviews
        .select(r::id.nullable())
        .filter(r::place_id.eq(place_id));
    let count = dsl::photos
        .filter(
            dsl::place_id
                .eq(place_id)
                .or(dsl::review_id.eq_any(reviews_of_place)),
        )
        .select(diesel::dsl::count_star())
        .first::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(u64::try_from(count).unwrap_or_default())
}

fn count_photos(conn: &mut SqliteConnection) -> Result<usize> {
    use schema::photos::dsl;
    let count = dsl::photos
        .select(diesel::dsl::count_star())
        .first::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count_rows(count))
}

fn load_recent_place_photos(
    conn: &mut SqliteConnection,
    place_id: &str,
    limit: u64,
) -> Result<Vec<Photo>> {
    use schema::photos::dsl;
    let entities = dsl::photos
        .filter(dsl::place_id.eq(place_id))
        .order_by((dsl::created_at.desc(), dsl::id.desc()))
        .limit(i64::try_from(limit).unwrap_or(i64::MAX))
        .select(models::PhotoEntity::as_select())
        .load::<models::PhotoEntity>(conn)
        .map_err(from_diesel_err)?;
    load_photos(entities)
}

// Only the most recent photo of each place. The place ids are bound
// to the `?` placeholders of the trailing `IN (...)` list.
const SELECT_LATEST_PHOTO_OF_PLACES: &str = "\
SELECT p.id AS id, p.purpose AS purpose, p.storage_path AS storage_path, \
p.place_id AS place_id, p.review_id AS review_id, p.uploaded_by AS uploaded_by, \
p.mime_type AS mime_type, p.width AS width, p.height AS height, \
p.file_size AS file_size, p.created_at AS created_at \
FROM photos p \
WHERE p.id = (\
SELECT l.id FROM photos l WHERE l.place_id = p.place_id \
ORDER BY l.created_at DESC, l.id DESC LIMIT 1) \
AND p.place_id IN (";

fn load_latest_photo_of_places(
    conn: &mut SqliteConnection,
    place_ids: &[&str],
) -> Result<Vec<Photo>> {
    use diesel::sql_types::Text;
    if place_ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; place_ids.len()].join(", ");
    let mut query = diesel::sql_query(format!("{SELECT_LATEST_PHOTO_OF_PLACES}{placeholders})"))
        .into_boxed::<diesel::sqlite::Sqlite>();
    for place_id in place_ids {
        query = query.bind::<Text, _>(place_id.to_string());
    }
    let entities = query
        .load::<models::PhotoEntity>(conn)
        .map_err(from_diesel_err)?;
    load_photos(entities)
}

fn load_photos_of_reviews(conn: &mut SqliteConnection, review_ids: &[&str]) -> Result<Vec<Photo>> {
    use schema::photos::dsl;
    if review_ids.is_empty() {
        return Ok(vec![]);
    }
    let entities = dsl::photos
        .filter(dsl::review_id.eq_any(review_ids.iter().copied()))
        .order_by((dsl::created_at.asc(), dsl::id.asc()))
        .select(models::PhotoEntity::as_select())
        .load::<models::PhotoEntity>(conn)
        .map_err(from_diesel_err)?;
    load_photos(entities)
}
