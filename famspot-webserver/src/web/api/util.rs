use super::*;

#[get("/ping")]
pub fn get_ping() -> Json<json::Pong> {
    Json(json::Pong { pong: true })
}

#[get("/version")]
pub fn get_version(version: &State<Version>) -> &'static str {
    version.0
}

fn items<T, U: From<T>>(items: Vec<T>) -> Json<json::Items<U>> {
    Json(json::Items {
        items: items.into_iter().map(Into::into).collect(),
    })
}

#[get("/categories")]
pub fn get_categories(db: &State<sqlite::Connections>) -> Result<json::Items<json::Category>> {
    Ok(items(usecases::list_categories(&db.shared()?)?))
}

#[get("/features")]
pub fn get_features(db: &State<sqlite::Connections>) -> Result<json::Items<json::Feature>> {
    Ok(items(usecases::list_features(&db.shared()?)?))
}

#[get("/age-bands")]
pub fn get_age_bands(db: &State<sqlite::Connections>) -> Result<json::Items<json::AgeBand>> {
    Ok(items(usecases::list_age_bands(&db.shared()?)?))
}

#[get("/review-axes")]
pub fn get_review_axes(db: &State<sqlite::Connections>) -> Result<json::Items<json::ReviewAxis>> {
    Ok(items(usecases::list_review_axes(&db.shared()?)?))
}
