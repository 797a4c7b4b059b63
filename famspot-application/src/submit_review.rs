use super::*;

/// Validates and stores a new review of `author_id` within
/// a single write transaction.
///
/// Either the review with all of its scores, the attached photos and
/// the refreshed statistics of the place are committed or nothing at all.
pub fn submit_review(
    connections: &sqlite::Connections,
    author_id: &Id,
    new_review: usecases::NewReview,
) -> Result<Id> {
    let review_id = {
        let mut connection = connections.exclusive()?;
        connection.transaction(|conn| {
            let storable = usecases::prepare_new_review(conn, author_id, new_review)
                .inspect_err(|err| debug!("Rejected new review: {err}"))?;
            let place_id = storable.place_id().clone();
            usecases::store_new_review(conn, storable).inspect_err(|err| {
                warn!("Failed to store new review for place {place_id}: {err}");
            })
        })
    }?;
    info!("Created review {review_id}");
    Ok(review_id)
}
