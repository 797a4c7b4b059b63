pub mod prelude {
    pub use famspot_core::{
        entities::*,
        repositories::{Error as RepoError, *},
        usecases,
    };
    pub use famspot_db_sqlite::DEFAULT_BUSY_TIMEOUT;

    pub mod sqlite {
        pub use super::super::super::sqlite::*;
    }

    pub use crate::{error::AppError, prelude as flows, prelude::ImportSummary, Result};

    pub struct BackendFixture {
        pub db_connections: sqlite::Connections,
    }

    impl BackendFixture {
        pub fn new() -> Self {
            // An in-memory database only lives as long as its
            // single connection.
            Self::with_file(":memory:")
        }

        pub fn with_file(db_url: &str) -> Self {
            let db_connections = sqlite::Connections::init(db_url, 1, DEFAULT_BUSY_TIMEOUT).unwrap();
            famspot_db_sqlite::run_embedded_database_migrations(
                db_connections.exclusive().unwrap(),
            )
            .unwrap();
            Self { db_connections }
        }

        pub fn create_place(&self, name: &str, lat: f64, lng: f64) -> Place {
            let db = self.db_connections.exclusive().unwrap();
            let category = db.get_category_by_code(Category::CODE_PARK).unwrap();
            let now = Timestamp::now();
            let place = Place {
                id: Id::new(),
                name: name.into(),
                kana: None,
                category_id: category.id,
                description: None,
                address: None,
                phone: None,
                website_url: None,
                price_range: None,
                opening_hours: None,
                pos: MapPoint::from_lat_lng_deg(lat, lng),
                provenance: Default::default(),
                created_at: now,
                updated_at: now,
            };
            db.create_or_update_place(&place).unwrap();
            place
        }

        pub fn upload_review_photo(&self, uploaded_by: &str) -> Id {
            let photo = Photo {
                id: Id::new(),
                purpose: PhotoPurpose::ReviewPhoto,
                storage_path: "reviews/upload.jpg".into(),
                place_id: None,
                review_id: None,
                uploaded_by: uploaded_by.into(),
                mime_type: Some("image/jpeg".into()),
                width: Some(800),
                height: Some(600),
                file_size: Some(54_321),
                created_at: Timestamp::now(),
            };
            let db = self.db_connections.exclusive().unwrap();
            db.create_photo(&photo).unwrap();
            photo.id
        }
    }
}
