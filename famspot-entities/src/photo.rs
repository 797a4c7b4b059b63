use strum::{AsRefStr, Display, EnumString};

use crate::{id::Id, time::Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PhotoPurpose {
    /// Uploaded to be attached to a review of the uploader.
    ReviewPhoto,
    /// Directly attached to a place.
    PlacePhoto,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id           : Id,
    pub purpose      : PhotoPurpose,
    /// Either an absolute URL or a path relative to the public media location.
    pub storage_path : String,
    pub place_id     : Option<Id>,
    pub review_id    : Option<Id>,
    pub uploaded_by  : Id,
    pub mime_type    : Option<String>,
    pub width        : Option<u32>,
    pub height       : Option<u32>,
    pub file_size    : Option<u64>,
    pub created_at   : Timestamp,
}

impl Photo {
    /// A photo may be attached to a new review only once and
    /// only by the user who uploaded it.
    pub fn is_attachable_by(&self, user_id: &Id) -> bool {
        self.purpose == PhotoPurpose::ReviewPhoto
            && self.review_id.is_none()
            && &self.uploaded_by == user_id
    }
}
