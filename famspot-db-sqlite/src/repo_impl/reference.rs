use super::*;

impl_repo!(ReferenceRepo {
    read fn all_categories(&self) -> Vec<Category>;
    read fn get_category(&self, id: &str) -> Category;
    read fn get_category_by_code(&self, code: &str) -> Category;
    read fn all_features(&self) -> Vec<Feature>;
    read fn features_by_codes(&self, codes: &[&str]) -> Vec<Feature>;
    read fn all_age_bands(&self) -> Vec<AgeBand>;
    read fn get_age_band(&self, id: &str) -> AgeBand;
    read fn all_review_axes(&self) -> Vec<ReviewAxis>;
    read fn review_axes_by_codes(&self, codes: &[&str]) -> Vec<ReviewAxis>;
});

fn all_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>> {
    use schema::categories::dsl;
    Ok(dsl::categories
        .order_by((dsl::sort.asc(), dsl::code.asc()))
        .select(models::CategoryEntity::as_select())
        .load::<models::CategoryEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn get_category(conn: &mut SqliteConnection, id: &str) -> Result<Category> {
    use schema::categories::dsl;
    Ok(dsl::categories
        .filter(dsl::id.eq(id))
        .select(models::CategoryEntity::as_select())
        .first::<models::CategoryEntity>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn get_category_by_code(conn: &mut SqliteConnection, code: &str) -> Result<Category> {
    use schema::categories::dsl;
    Ok(dsl::categories
        .filter(dsl::code.eq(code))
        .select(models::CategoryEntity::as_select())
        .first::<models::CategoryEntity>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn all_features(conn: &mut SqliteConnection) -> Result<Vec<Feature>> {
    use schema::features::dsl;
    Ok(dsl::features
        .order_by((dsl::group_tag.asc(), dsl::code.asc()))
        .select(models::FeatureEntity::as_select())
        .load::<models::FeatureEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn features_by_codes(conn: &mut SqliteConnection, codes: &[&str]) -> Result<Vec<Feature>> {
    use schema::features::dsl;
    if codes.is_empty() {
        return Ok(vec![]);
    }
    Ok(dsl::features
        .filter(dsl::code.eq_any(codes.iter().copied()))
        .order_by(dsl::code.asc())
        .select(models::FeatureEntity::as_select())
        .load::<models::FeatureEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn all_age_bands(conn: &mut SqliteConnection) -> Result<Vec<AgeBand>> {
    use schema::age_bands::dsl;
    Ok(dsl::age_bands
        .order_by((dsl::sort.asc(), dsl::code.asc()))
        .select(models::AgeBandEntity::as_select())
        .load::<models::AgeBandEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn get_age_band(conn: &mut SqliteConnection, id: &str) -> Result<AgeBand> {
    use schema::age_bands::dsl;
    Ok(dsl::age_bands
        .filter(dsl::id.eq(id))
        .select(models::AgeBandEntity::as_select())
        .first::<models::AgeBandEntity>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn all_review_axes(conn: &mut SqliteConnection) -> Result<Vec<ReviewAxis>> {
    use schema::review_axes::dsl;
    Ok(dsl::review_axes
        .order_by((dsl::sort.asc(), dsl::code.asc()))
        .select(models::ReviewAxisEntity::as_select())
        .load::<models::ReviewAxisEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn review_axes_by_codes(conn: &mut SqliteConnection, codes: &[&str]) -> Result<Vec<ReviewAxis>> {
    use schema::review_axes::dsl;
    if codes.is_empty() {
        return Ok(vec![]);
    }
    Ok(dsl::review_axes
        .filter(dsl::code.eq_any(codes.iter().copied()))
        .order_by((dsl::sort.asc(), dsl::code.asc()))
        .select(models::ReviewAxisEntity::as_select())
        .load::<models::ReviewAxisEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}
