use super::*;

impl_repo!(PlaceRepo {
    read fn get_place(&self, id: &str) -> Place;
    read fn get_place_by_external_id(&self, external_id: &str) -> Place;
    read fn count_places(&self) -> usize;
    read fn load_present_place_features(&self, place_id: &str) -> Vec<PlaceFeatureWithRef>;
    read fn load_present_feature_codes_of_places(&self, place_ids: &[&str]) -> Vec<(Id, String)>;
    write fn create_or_update_place(&self, place: &Place) -> ();
    write fn replace_place_features(&self, place_id: &str, features: &[PlaceFeature]) -> ();
});

fn load_place(entity: models::PlaceEntity) -> Result<Place> {
    let models::PlaceEntity {
        id,
        name,
        kana,
        category_id,
        description,
        address,
        phone,
        website_url,
        price_range,
        opening_hours,
        lat,
        lng,
        external_id,
        data_source,
        manual_lock,
        synced_at,
        created_at,
        updated_at,
    } = entity;
    let pos = MapPoint::try_from_lat_lng_deg(lat, lng).map_err(anyhow::Error::from)?;
    let data_source = data_source
        .parse::<DataSource>()
        .map_err(|_| anyhow!("Invalid data source: {data_source}"))?;
    Ok(Place {
        id: id.into(),
        name,
        kana,
        category_id: category_id.into(),
        description,
        address,
        phone,
        website_url,
        price_range,
        opening_hours,
        pos,
        provenance: Provenance {
            data_source,
            external_id,
            manual_lock,
            synced_at: synced_at.map(load_timestamp),
        },
        created_at: load_timestamp(created_at),
        updated_at: load_timestamp(updated_at),
    })
}

fn get_place(conn: &mut SqliteConnection, id: &str) -> Result<Place> {
    use schema::places::dsl;
    let entity = dsl::places
        .filter(dsl::id.eq(id))
        .select(models::PlaceEntity::as_select())
        .first::<models::PlaceEntity>(conn)
        .map_err(from_diesel_err)?;
    load_place(entity)
}

fn get_place_by_external_id(conn: &mut SqliteConnection, external_id: &str) -> Result<Place> {
    use schema::places::dsl;
    let entity = dsl::places
        .filter(dsl::external_id.eq(external_id))
        .select(models::PlaceEntity::as_select())
        .first::<models::PlaceEntity>(conn)
        .map_err(from_diesel_err)?;
    load_place(entity)
}

fn count_places(conn: &mut SqliteConnection) -> Result<usize> {
    use schema::places::dsl;
    let count = dsl::places
        .select(diesel::dsl::count_star())
        .first::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count_rows(count))
}

fn create_or_update_place(conn: &mut SqliteConnection, place: &Place) -> Result<()> {
    use schema::places::dsl;
    let new_place = models::NewPlace::from(place);
    diesel::insert_into(schema::places::table)
        .values(&new_place)
        .on_conflict(dsl::id)
        .do_update()
        .set(&new_place)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn replace_place_features(
    conn: &mut SqliteConnection,
    place_id: &str,
    features: &[PlaceFeature],
) -> Result<()> {
    use schema::place_features::dsl;
    diesel::delete(dsl::place_features.filter(dsl::place_id.eq(place_id)))
        .execute(conn)
        .map_err(from_diesel_err)?;
    if features.is_empty() {
        return Ok(());
    }
    let new_features: Vec<_> = features
        .iter()
        .map(
            |PlaceFeature {
                 feature_id,
                 value,
                 detail,
             }| models::NewPlaceFeature {
                place_id,
                feature_id: feature_id.as_str(),
                value: *value,
                detail: detail.as_deref(),
            },
        )
        .collect();
    diesel::insert_into(schema::place_features::table)
        .values(&new_features)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn load_present_place_features(
    conn: &mut SqliteConnection,
    place_id: &str,
) -> Result<Vec<PlaceFeatureWithRef>> {
    use schema::{features::dsl as f, place_features::dsl as pf};
    Ok(schema::place_features::table
        .inner_join(schema::features::table)
        .filter(pf::place_id.eq(place_id))
        .filter(pf::value.gt(0_i16))
        .order_by(f::code.asc())
        .select((models::FeatureEntity::as_select(), pf::value, pf::detail))
        .load::<(models::FeatureEntity, Option<i16>, Option<String>)>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|(feature, value, detail)| PlaceFeatureWithRef {
            feature: feature.into(),
            value,
            detail,
        })
        .collect())
}

fn load_present_feature_codes_of_places(
    conn: &mut SqliteConnection,
    place_ids: &[&str],
) -> Result<Vec<(Id, String)>> {
    use schema::{features::dsl as f, place_features::dsl as pf};
    if place_ids.is_empty() {
        return Ok(vec![]);
    }
    Ok(schema::place_features::table
        .inner_join(schema::features::table)
        .filter(pf::place_id.eq_any(place_ids.iter().copied()))
        .filter(pf::value.gt(0_i16))
        .order_by((pf::place_id.asc(), f::code.asc()))
        .select((pf::place_id, f::code))
        .load::<(String, String)>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(|(place_id, code)| (place_id.into(), code))
        .collect())
}
