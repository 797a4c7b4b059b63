use super::*;

/// Search parameters are validated by the use case to
/// report the offending field.
#[rustfmt::skip]
#[derive(Debug, Default, FromForm)]
pub struct SearchQuery {
    lat      : Option<String>,
    lng      : Option<String>,
    radius_m : Option<String>,
    limit    : Option<String>,
    cursor   : Option<String>,
    sort     : Option<String>,
    q        : Option<String>,
    category : Option<String>,
    /// Repeated and/or comma separated
    features : Vec<String>,
}

impl From<SearchQuery> for usecases::SearchPlacesParams {
    fn from(from: SearchQuery) -> Self {
        let SearchQuery {
            lat,
            lng,
            radius_m,
            limit,
            cursor,
            sort,
            q,
            category,
            features,
        } = from;
        Self {
            lat,
            lng,
            radius_m,
            limit,
            cursor,
            sort,
            q,
            category,
            features,
        }
    }
}

#[get("/places?<query..>")]
pub fn get_places(
    db: &State<sqlite::Connections>,
    cfg: &State<Cfg>,
    query: SearchQuery,
) -> Result<json::PlaceSearchResponse> {
    let params = query.into();
    let req = usecases::parse_search_request(&params, &cfg.search_limits)?;
    let result = usecases::search_places(&db.shared()?, &req)?;
    Ok(Json(to_json::place_search_response(
        cfg.public_media_url(),
        result,
    )))
}

#[get("/places/<id>")]
pub fn get_place(
    db: &State<sqlite::Connections>,
    cfg: &State<Cfg>,
    id: &str,
) -> Result<json::PlaceDetail> {
    let detail = usecases::load_place_detail(&db.shared()?, id)?;
    Ok(Json(to_json::place_detail(cfg.public_media_url(), detail)))
}

#[derive(Debug, Default, FromForm)]
pub struct ReviewListQuery {
    limit: Option<String>,
    cursor: Option<String>,
    sort: Option<String>,
    has_photo: Option<String>,
}

#[get("/places/<id>/reviews?<query..>")]
pub fn get_place_reviews(
    db: &State<sqlite::Connections>,
    cfg: &State<Cfg>,
    id: &str,
    query: ReviewListQuery,
) -> Result<json::ReviewListResponse> {
    let ReviewListQuery {
        limit,
        cursor,
        sort,
        has_photo,
    } = query;
    let params = usecases::ListPlaceReviewsParams {
        limit,
        cursor,
        sort,
        has_photo,
    };
    let req = usecases::parse_review_list_request(id, &params)?;
    let reviews = usecases::list_place_reviews(&db.shared()?, &req)?;
    Ok(Json(to_json::review_list_response(
        cfg.public_media_url(),
        reviews,
    )))
}
