use super::*;

impl_repo!(UserRepo {
    read fn get_user(&self, id: &str) -> User;
    read fn get_users(&self, ids: &[&str]) -> Vec<User>;
    write fn create_user(&self, user: &User) -> ();
});

fn create_user(conn: &mut SqliteConnection, user: &User) -> Result<()> {
    let User {
        id,
        email,
        nickname,
    } = user;
    let new_user = models::NewUser {
        id: id.as_str(),
        email,
        nickname: nickname.as_deref(),
        created_at: Timestamp::now().as_millis(),
    };
    diesel::insert_into(schema::users::table)
        .values(&new_user)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn get_user(conn: &mut SqliteConnection, id: &str) -> Result<User> {
    use schema::users::dsl;
    Ok(dsl::users
        .filter(dsl::id.eq(id))
        .select(models::UserEntity::as_select())
        .first::<models::UserEntity>(conn)
        .map_err(from_diesel_err)?
        .into())
}

fn get_users(conn: &mut SqliteConnection, ids: &[&str]) -> Result<Vec<User>> {
    use schema::users::dsl;
    if ids.is_empty() {
        return Ok(vec![]);
    }
    Ok(dsl::users
        .filter(dsl::id.eq_any(ids.iter().copied()))
        .select(models::UserEntity::as_select())
        .load::<models::UserEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}
