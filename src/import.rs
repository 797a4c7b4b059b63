use anyhow::{Context, Result};
use famspot_application::prelude::{import_places, ImportSummary};
use famspot_boundary as json;
use famspot_core::usecases;
use famspot_db_sqlite::Connections;
use std::{fs, io::Read, path::Path};

/// Reads a JSON array of external place records.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<usecases::ExternalPlace>> {
    let records: Vec<json::ExternalPlace> = serde_json::from_reader(reader)?;
    Ok(records.into_iter().map(external_place).collect())
}

fn external_place(from: json::ExternalPlace) -> usecases::ExternalPlace {
    let json::ExternalPlace {
        external_id,
        name,
        kana,
        category,
        lat,
        lng,
        description,
        address,
        phone,
        website_url,
        price_range,
        opening_hours,
        features,
    } = from;
    let opening_hours = opening_hours
        .filter(|v| !v.is_null())
        .map(|v| v.to_string());
    let features = features
        .into_iter()
        .map(|f| usecases::ExternalPlaceFeature {
            code: f.code,
            value: f.value,
            detail: f.detail,
        })
        .collect();
    usecases::ExternalPlace {
        external_id,
        name,
        kana,
        category,
        lat,
        lng,
        description,
        address,
        phone,
        website_url,
        price_range,
        opening_hours,
        features,
    }
}

pub fn import_file(connections: &Connections, path: &Path) -> Result<ImportSummary> {
    let file = fs::File::open(path)
        .with_context(|| format!("Unable to open import file {}", path.display()))?;
    let records = read_records(file)
        .with_context(|| format!("Unable to read external places from {}", path.display()))?;
    log::info!("Importing {} external places", records.len());
    let summary = import_places(connections, records)?;
    log::info!(
        "Import finished: {} created, {} updated, {} skipped",
        summary.created,
        summary.updated,
        summary.skipped()
    );
    Ok(summary)
}
