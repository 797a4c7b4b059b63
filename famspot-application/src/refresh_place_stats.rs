use super::*;

/// Recomputes the statistics of a place from its reviews and photos.
pub fn refresh_place_stats(connections: &sqlite::Connections, place_id: &str) -> Result<PlaceStats> {
    let mut connection = connections.exclusive()?;
    Ok(connection.transaction(|conn| {
        // Fail with NotFound instead of a foreign key violation
        conn.get_place(place_id)?;
        usecases::refresh_place_stats(conn, place_id)
    })?)
}
