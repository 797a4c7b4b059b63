use super::*;

/// Number of records per outcome of an import.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created        : usize,
    pub updated        : usize,
    pub skipped_locked : usize,
    pub invalid        : usize,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_locked + self.invalid
    }
}

/// Upserts external place records one by one.
///
/// Every record is stored in its own transaction. Invalid records
/// and manually locked places are skipped, any other failure
/// aborts the import.
pub fn import_places<I>(connections: &sqlite::Connections, records: I) -> Result<ImportSummary>
where
    I: IntoIterator<Item = usecases::ExternalPlace>,
{
    let mut summary = ImportSummary::default();
    for record in records {
        let external_id = record.external_id.clone();
        let outcome = {
            let mut connection = connections.exclusive()?;
            connection.transaction(|conn| usecases::import_external_place(conn, record))
        };
        match outcome {
            Ok(usecases::ImportOutcome::Created(id)) => {
                debug!("Created place {id} from external record {external_id}");
                summary.created += 1;
            }
            Ok(usecases::ImportOutcome::Updated(id)) => {
                debug!("Updated place {id} from external record {external_id}");
                summary.updated += 1;
            }
            Ok(usecases::ImportOutcome::SkippedLocked(id)) => {
                warn!("Skipped external record {external_id}: place {id} is locked");
                summary.skipped_locked += 1;
            }
            Err(usecases::Error::Validation(err)) => {
                warn!("Skipped invalid external record {external_id}: {err:?}");
                summary.invalid += 1;
            }
            Err(err) => {
                error!("Failed to import external record {external_id}: {err}");
                return Err(err.into());
            }
        }
    }
    info!(
        "Imported places: {} created, {} updated, {} skipped",
        summary.created,
        summary.updated,
        summary.skipped()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    fn external_place(external_id: &str, name: &str) -> usecases::ExternalPlace {
        usecases::ExternalPlace {
            external_id: external_id.into(),
            name: name.into(),
            kana: None,
            category: "park".into(),
            lat: 35.0,
            lng: 139.0,
            description: None,
            address: None,
            phone: None,
            website_url: None,
            price_range: None,
            opening_hours: None,
            features: vec![usecases::ExternalPlaceFeature {
                code: "diaper_table".into(),
                value: Some(1),
                detail: None,
            }],
        }
    }

    #[test]
    fn create_update_and_skip_records() {
        let fixture = BackendFixture::new();

        let summary = flows::import_places(
            &fixture.db_connections,
            vec![external_place("ext-1", "Sunny park"), external_place("ext-2", "Shady park")],
        )
        .unwrap();
        assert_eq!(2, summary.created);

        let invalid = usecases::ExternalPlace {
            lat: 91.0,
            ..external_place("ext-3", "Nowhere")
        };
        let unknown_category = usecases::ExternalPlace {
            category: "zoo".into(),
            ..external_place("ext-4", "Zoo")
        };
        let summary = flows::import_places(
            &fixture.db_connections,
            vec![external_place("ext-1", "Sunny park (renamed)"), invalid, unknown_category],
        )
        .unwrap();
        assert_eq!(
            ImportSummary {
                created: 0,
                updated: 1,
                skipped_locked: 0,
                invalid: 2,
            },
            summary
        );

        let db = fixture.db_connections.shared().unwrap();
        assert_eq!(2, db.count_places().unwrap());
        let place = db.get_place_by_external_id("ext-1").unwrap();
        assert_eq!("Sunny park (renamed)", place.name);
        assert_eq!(DataSource::External, place.provenance.data_source);
        let features = db.load_present_place_features(place.id.as_str()).unwrap();
        assert_eq!(vec!["diaper_table"], features.iter().map(|f| f.feature.code.as_str()).collect::<Vec<_>>());
    }

    #[test]
    fn never_overwrite_locked_places() {
        let fixture = BackendFixture::new();
        flows::import_places(&fixture.db_connections, vec![external_place("ext-1", "Original")]).unwrap();
        {
            let db = fixture.db_connections.exclusive().unwrap();
            let mut place = db.get_place_by_external_id("ext-1").unwrap();
            place.provenance.manual_lock = true;
            db.create_or_update_place(&place).unwrap();
        }

        let summary =
            flows::import_places(&fixture.db_connections, vec![external_place("ext-1", "Overwritten")])
                .unwrap();
        assert_eq!(1, summary.skipped_locked);

        let db = fixture.db_connections.shared().unwrap();
        assert_eq!("Original", db.get_place_by_external_id("ext-1").unwrap().name);
    }
}
