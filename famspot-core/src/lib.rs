pub mod db;
pub mod repositories;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use famspot_entities::{
        age_band::*, category::*, feature::*, geo::*, id::*, photo::*, place::*, rating::*,
        review::*, stats::*, time::*, user::*,
    };
}

pub use repositories::Error as RepoError;
