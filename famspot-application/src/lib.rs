#[macro_use]
extern crate log;

mod import_places;
mod refresh_place_stats;
mod submit_review;

pub mod prelude {
    pub use super::{import_places::*, refresh_place_stats::*, submit_review::*};
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use famspot_core::{entities::*, repositories::*, usecases};

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use famspot_db_sqlite::Connections;
}
