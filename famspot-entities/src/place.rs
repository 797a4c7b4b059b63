use strum::{AsRefStr, Display, EnumString};

use crate::{feature::Feature, geo::MapPoint, id::Id, time::Timestamp};

/// Where the data of a place originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DataSource {
    /// Imported and synchronized from an external place provider.
    External,
    /// Entered and maintained by editors.
    #[default]
    Manual,
}

/// Provenance of the place data.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Provenance {
    pub data_source : DataSource,
    /// Identifier of the place at the external provider, unique if present.
    pub external_id : Option<String>,
    /// Prevents any automatic synchronization from overwriting manual edits.
    pub manual_lock : bool,
    pub synced_at   : Option<Timestamp>,
}

impl Provenance {
    pub fn is_external(&self) -> bool {
        self.external_id.is_some()
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id            : Id,
    pub name          : String,
    /// Phonetic reading of the name.
    pub kana          : Option<String>,
    pub category_id   : Id,
    pub description   : Option<String>,
    pub address       : Option<String>,
    pub phone         : Option<String>,
    pub website_url   : Option<String>,
    pub price_range   : Option<String>,
    /// Structured opening hours as an opaque JSON document.
    pub opening_hours : Option<String>,
    pub pos           : MapPoint,
    pub provenance    : Provenance,
    pub created_at    : Timestamp,
    pub updated_at    : Timestamp,
}

impl Place {
    /// Lower-case projection of all text fields that are
    /// matched by free-text search.
    pub fn search_text(&self) -> String {
        [
            Some(self.name.as_str()),
            self.kana.as_deref(),
            self.description.as_deref(),
            self.address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
    }
}

/// The value of a family-friendly facility at a place.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceFeature {
    pub feature_id : Id,
    /// Degree of availability: `None` or `0` means "not present".
    pub value      : Option<i16>,
    pub detail     : Option<String>,
}

impl PlaceFeature {
    pub fn is_present(&self) -> bool {
        self.value.map(|v| v > 0).unwrap_or(false)
    }
}

/// A place feature together with its reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceFeatureWithRef {
    pub feature: Feature,
    pub value: Option<i16>,
    pub detail: Option<String>,
}

impl PlaceFeatureWithRef {
    pub fn is_present(&self) -> bool {
        self.value.map(|v| v > 0).unwrap_or(false)
    }
}
