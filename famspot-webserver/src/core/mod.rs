pub use famspot_core::{db, repositories, usecases, util};

pub mod entities {
    pub use famspot_core::entities::*;
}

pub mod prelude {
    pub use super::{db::*, entities::*, repositories::*};
}
