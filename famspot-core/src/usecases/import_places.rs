use super::prelude::*;
use crate::util::validate::{non_blank, ValidationError};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPlaceFeature {
    pub code   : String,
    pub value  : Option<i16>,
    pub detail : Option<String>,
}

/// A place record of an external provider.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPlace {
    pub external_id   : String,
    pub name          : String,
    pub kana          : Option<String>,
    pub category      : String,
    pub lat           : f64,
    pub lng           : f64,
    pub description   : Option<String>,
    pub address       : Option<String>,
    pub phone         : Option<String>,
    pub website_url   : Option<String>,
    pub price_range   : Option<String>,
    pub opening_hours : Option<String>,
    pub features      : Vec<ExternalPlaceFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Created(Id),
    Updated(Id),
    /// Manually maintained places are never overwritten.
    SkippedLocked(Id),
}

fn optional(s: Option<String>) -> Option<String> {
    non_blank(s.as_deref()).map(ToOwned::to_owned)
}

/// Creates or updates a place from an external record.
pub fn import_external_place<R>(repo: &R, ext: ExternalPlace) -> Result<ImportOutcome>
where
    R: PlaceRepo + ReferenceRepo,
{
    let external_id = non_blank(Some(ext.external_id.as_str()))
        .ok_or_else(|| ValidationError::field("external_id", "is required"))?
        .to_owned();
    let name = non_blank(Some(ext.name.as_str()))
        .ok_or_else(|| ValidationError::field("name", "is required"))?
        .to_owned();
    let pos = MapPoint::try_from_lat_lng_deg(ext.lat, ext.lng)
        .map_err(|err| ValidationError::field("location", err.to_string()))?;
    let category = match repo.get_category_by_code(ext.category.trim()) {
        Ok(category) => category,
        Err(RepoError::NotFound) => {
            return Err(ValidationError::field("category", "is unknown").into());
        }
        Err(err) => return Err(err.into()),
    };
    let codes: Vec<_> = ext.features.iter().map(|f| f.code.as_str()).collect();
    let known_features = repo.features_by_codes(&codes)?;
    let mut features = Vec::with_capacity(ext.features.len());
    for ExternalPlaceFeature {
        code,
        value,
        detail,
    } in ext.features
    {
        let Some(feature) = known_features.iter().find(|f| f.code == code) else {
            return Err(ValidationError::field("features", format!("{code} is unknown")).into());
        };
        features.push(PlaceFeature {
            feature_id: feature.id.clone(),
            value,
            detail: optional(detail),
        });
    }

    let existing = match repo.get_place_by_external_id(&external_id) {
        Ok(place) => Some(place),
        Err(RepoError::NotFound) => None,
        Err(err) => return Err(err.into()),
    };
    if let Some(place) = &existing {
        if place.provenance.manual_lock {
            return Ok(ImportOutcome::SkippedLocked(place.id.clone()));
        }
    }

    let now = Timestamp::now();
    let (id, created_at) = existing
        .as_ref()
        .map(|p| (p.id.clone(), p.created_at))
        .unwrap_or_else(|| (Id::new(), now));
    let place = Place {
        id: id.clone(),
        name,
        kana: optional(ext.kana),
        category_id: category.id,
        description: optional(ext.description),
        address: optional(ext.address),
        phone: optional(ext.phone),
        website_url: optional(ext.website_url),
        price_range: optional(ext.price_range),
        opening_hours: optional(ext.opening_hours),
        pos,
        provenance: Provenance {
            data_source: DataSource::External,
            external_id: Some(external_id),
            manual_lock: false,
            synced_at: Some(now),
        },
        created_at,
        updated_at: now,
    };
    repo.create_or_update_place(&place)?;
    repo.replace_place_features(id.as_str(), &features)?;
    Ok(if existing.is_some() {
        ImportOutcome::Updated(id)
    } else {
        ImportOutcome::Created(id)
    })
}
