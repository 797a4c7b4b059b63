mod error;
mod import_places;
mod list_place_reviews;
mod place_detail;
mod refresh_place_stats;
mod search_places;
mod submit_review;


pub use self::{
    error::Error, import_places::*, list_place_reviews::*, place_detail::*,
    refresh_place_stats::*, search_places::*, submit_review::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{db::*, entities::*, repositories::*, RepoError};
}
use self::prelude::*;

pub fn list_categories<R: ReferenceRepo>(repo: &R) -> Result<Vec<Category>> {
    Ok(repo.all_categories()?)
}

pub fn list_features<R: ReferenceRepo>(repo: &R) -> Result<Vec<Feature>> {
    Ok(repo.all_features()?)
}

pub fn list_age_bands<R: ReferenceRepo>(repo: &R) -> Result<Vec<AgeBand>> {
    Ok(repo.all_age_bands()?)
}

pub fn list_review_axes<R: ReferenceRepo>(repo: &R) -> Result<Vec<ReviewAxis>> {
    Ok(repo.all_review_axes()?)
}
