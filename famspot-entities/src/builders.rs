pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{photo_builder::*, place_builder::*, review_builder::*};

pub mod place_builder {

    use super::*;
    use crate::{geo::*, id::*, place::*, time::*};

    #[derive(Debug)]
    pub struct PlaceBuild {
        place: Place,
    }

    impl PlaceBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.place.id = id.into();
            self
        }
        pub fn name(mut self, name: &str) -> Self {
            self.place.name = name.into();
            self
        }
        pub fn kana(mut self, kana: &str) -> Self {
            self.place.kana = Some(kana.into());
            self
        }
        pub fn category_id(mut self, id: &str) -> Self {
            self.place.category_id = id.into();
            self
        }
        pub fn description(mut self, desc: &str) -> Self {
            self.place.description = Some(desc.into());
            self
        }
        pub fn address(mut self, address: &str) -> Self {
            self.place.address = Some(address.into());
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.place.pos = pos;
            self
        }
        pub fn lat_lng(self, lat: f64, lng: f64) -> Self {
            self.pos(MapPoint::from_lat_lng_deg(lat, lng))
        }
        pub fn opening_hours(mut self, json: &str) -> Self {
            self.place.opening_hours = Some(json.into());
            self
        }
        pub fn external_id(mut self, external_id: &str) -> Self {
            self.place.provenance.data_source = DataSource::External;
            self.place.provenance.external_id = Some(external_id.into());
            self
        }
        pub fn manual_lock(mut self, lock: bool) -> Self {
            self.place.provenance.manual_lock = lock;
            self
        }
        pub fn created_at(mut self, created_at: Timestamp) -> Self {
            self.place.created_at = created_at;
            self.place.updated_at = created_at;
            self
        }
        pub fn finish(self) -> Place {
            self.place
        }
    }

    impl Builder for Place {
        type Build = PlaceBuild;
        fn build() -> PlaceBuild {
            let now = Timestamp::now();
            PlaceBuild {
                place: Place {
                    id: Id::new(),
                    name: "".into(),
                    kana: None,
                    category_id: "".into(),
                    description: None,
                    address: None,
                    phone: None,
                    website_url: None,
                    price_range: None,
                    opening_hours: None,
                    pos: MapPoint::from_lat_lng_deg(0.0, 0.0),
                    provenance: Default::default(),
                    created_at: now,
                    updated_at: now,
                },
            }
        }
    }
}

pub mod review_builder {

    use super::*;
    use crate::{id::*, rating::*, review::*, time::*};

    #[derive(Debug)]
    pub struct ReviewBuild {
        review: Review,
    }

    impl ReviewBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.review.id = id.into();
            self
        }
        pub fn place_id(mut self, id: &str) -> Self {
            self.review.place_id = id.into();
            self
        }
        pub fn author_id(mut self, id: &str) -> Self {
            self.review.author_id = id.into();
            self
        }
        pub fn overall(mut self, overall: u8) -> Self {
            self.review.overall = RatingValue::new(overall);
            self
        }
        pub fn status(mut self, status: ReviewStatus) -> Self {
            self.review.status = status;
            self
        }
        pub fn text(mut self, text: &str) -> Self {
            self.review.text = text.into();
            self
        }
        pub fn created_at(mut self, created_at: Timestamp) -> Self {
            self.review.created_at = created_at;
            self.review.updated_at = created_at;
            self
        }
        pub fn finish(self) -> Review {
            self.review
        }
    }

    impl Builder for Review {
        type Build = ReviewBuild;
        fn build() -> ReviewBuild {
            let now = Timestamp::now();
            ReviewBuild {
                review: Review {
                    id: Id::new(),
                    place_id: "".into(),
                    author_id: "".into(),
                    overall: RatingValue::max(),
                    age_band_id: None,
                    stay_minutes: None,
                    revisit_intent: None,
                    text: "".into(),
                    status: ReviewStatus::Public,
                    created_at: now,
                    updated_at: now,
                },
            }
        }
    }
}

pub mod photo_builder {

    use super::*;
    use crate::{id::*, photo::*, time::*};

    #[derive(Debug)]
    pub struct PhotoBuild {
        photo: Photo,
    }

    impl PhotoBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.photo.id = id.into();
            self
        }
        pub fn purpose(mut self, purpose: PhotoPurpose) -> Self {
            self.photo.purpose = purpose;
            self
        }
        pub fn storage_path(mut self, path: &str) -> Self {
            self.photo.storage_path = path.into();
            self
        }
        pub fn place_id(mut self, id: &str) -> Self {
            self.photo.place_id = Some(id.into());
            self
        }
        pub fn review_id(mut self, id: &str) -> Self {
            self.photo.review_id = Some(id.into());
            self
        }
        pub fn uploaded_by(mut self, id: &str) -> Self {
            self.photo.uploaded_by = id.into();
            self
        }
        pub fn size(mut self, width: u32, height: u32) -> Self {
            self.photo.width = Some(width);
            self.photo.height = Some(height);
            self
        }
        pub fn created_at(mut self, created_at: Timestamp) -> Self {
            self.photo.created_at = created_at;
            self
        }
        pub fn finish(self) -> Photo {
            self.photo
        }
    }

    impl Builder for Photo {
        type Build = PhotoBuild;
        fn build() -> PhotoBuild {
            let id = Id::new();
            PhotoBuild {
                photo: Photo {
                    storage_path: format!("review/{id}.jpg"),
                    id,
                    purpose: PhotoPurpose::ReviewPhoto,
                    place_id: None,
                    review_id: None,
                    uploaded_by: "".into(),
                    mime_type: Some("image/jpeg".into()),
                    width: None,
                    height: None,
                    file_size: None,
                    created_at: Timestamp::now(),
                },
            }
        }
    }
}
