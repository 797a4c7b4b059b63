use famspot_entities as e;

use super::*;

impl From<e::category::Category> for Category {
    fn from(from: e::category::Category) -> Self {
        let e::category::Category {
            id,
            code,
            label,
            sort,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            sort,
        }
    }
}

impl From<e::category::Category> for CategoryRef {
    fn from(from: e::category::Category) -> Self {
        let e::category::Category { code, label, .. } = from;
        Self { code, label }
    }
}

impl From<e::feature::Feature> for Feature {
    fn from(from: e::feature::Feature) -> Self {
        let e::feature::Feature {
            id,
            code,
            label,
            group,
            description,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            group,
            description,
        }
    }
}

impl From<e::age_band::AgeBand> for AgeBand {
    fn from(from: e::age_band::AgeBand) -> Self {
        let e::age_band::AgeBand {
            id,
            code,
            label,
            sort,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            sort,
        }
    }
}

impl From<e::review::ReviewAxis> for ReviewAxis {
    fn from(from: e::review::ReviewAxis) -> Self {
        let e::review::ReviewAxis {
            id,
            code,
            label,
            sort,
        } = from;
        Self {
            id: id.into(),
            code,
            label,
            sort,
        }
    }
}

impl From<e::place::PlaceFeatureWithRef> for PlaceFeature {
    fn from(from: e::place::PlaceFeatureWithRef) -> Self {
        let e::place::PlaceFeatureWithRef {
            feature,
            value,
            detail,
        } = from;
        Self {
            code: feature.code,
            label: feature.label,
            group: feature.group,
            value,
            detail,
        }
    }
}

impl From<e::user::User> for UserRef {
    fn from(from: e::user::User) -> Self {
        let e::user::User { id, nickname, .. } = from;
        Self {
            id: id.into(),
            nickname,
        }
    }
}

impl From<e::geo::MapPoint> for Location {
    fn from(from: e::geo::MapPoint) -> Self {
        let (lat, lng) = from.to_lat_lng_deg();
        Self {
            lat,
            lng,
            distance_m: None,
        }
    }
}

impl ExternalSource {
    /// Only places that are synchronized from an external
    /// provider have a source.
    pub fn from_provenance(provenance: &e::place::Provenance) -> Option<Self> {
        let e::place::Provenance {
            data_source,
            external_id,
            synced_at,
            ..
        } = provenance;
        external_id.as_ref().map(|id| Self {
            id: id.clone(),
            source: data_source.to_string(),
            synced_at: synced_at.map(Into::into),
        })
    }
}
