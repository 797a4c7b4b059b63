use super::*;

#[post("/reviews", data = "<review>")]
pub fn post_review(
    db: &State<sqlite::Connections>,
    account: Account,
    review: JsonResult<json::NewReview>,
) -> result::Result<status::Custom<Json<json::CreatedReview>>, ApiError> {
    let review = from_json::new_review(review?.into_inner());
    let review_id = flows::submit_review(db.inner(), account.user_id(), review)?;
    Ok(status::Custom(
        Status::Created,
        Json(json::CreatedReview {
            review_id: review_id.into(),
        }),
    ))
}
