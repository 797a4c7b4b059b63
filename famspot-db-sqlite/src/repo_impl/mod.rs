use anyhow::anyhow;
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

use famspot_core::{
    db::*,
    entities::*,
    repositories::{self as repo, *},
};

use super::*;

type Result<T> = std::result::Result<T, repo::Error>;

/// Implements a repository trait for all connection handles by
/// delegating to the free functions of the same name.
///
/// Write operations are rejected on read-only connections.
macro_rules! impl_repo {
    ($repo:ident {
        $( read fn $r_name:ident(&self $(, $r_arg:ident: $r_ty:ty)*) -> $r_ret:ty; )*
        $( write fn $w_name:ident(&self $(, $w_arg:ident: $w_ty:ty)*) -> $w_ret:ty; )*
    }) => {
        impl $repo for DbReadOnly<'_> {
            $(
                fn $r_name(&self $(, $r_arg: $r_ty)*) -> Result<$r_ret> {
                    $r_name(&mut self.conn.borrow_mut() $(, $r_arg)*)
                }
            )*
            $(
                fn $w_name(&self $(, $w_arg: $w_ty)*) -> Result<$w_ret> {
                    $( let _ = $w_arg; )*
                    Err(read_only_violation(stringify!($w_name)))
                }
            )*
        }

        impl $repo for DbReadWrite<'_> {
            $(
                fn $r_name(&self $(, $r_arg: $r_ty)*) -> Result<$r_ret> {
                    $r_name(&mut self.conn.borrow_mut() $(, $r_arg)*)
                }
            )*
            $(
                fn $w_name(&self $(, $w_arg: $w_ty)*) -> Result<$w_ret> {
                    $w_name(&mut self.conn.borrow_mut() $(, $w_arg)*)
                }
            )*
        }

        impl $repo for DbConnection<'_> {
            $(
                fn $r_name(&self $(, $r_arg: $r_ty)*) -> Result<$r_ret> {
                    $r_name(&mut self.conn.borrow_mut() $(, $r_arg)*)
                }
            )*
            $(
                fn $w_name(&self $(, $w_arg: $w_ty)*) -> Result<$w_ret> {
                    $w_name(&mut self.conn.borrow_mut() $(, $w_arg)*)
                }
            )*
        }
    };
}

mod geo;
mod photo;
mod place;
mod reference;
mod review;
mod stats;
mod user;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

fn read_only_violation(operation: &str) -> repo::Error {
    log::error!("Write operation {operation} invoked on a read-only connection");
    anyhow!("{operation} requires a read/write connection").into()
}

fn count_rows(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}

fn load_timestamp(millis: i64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn load_rating_value(value: i16) -> Result<RatingValue> {
    RatingValue::try_new(i64::from(value))
        .ok_or_else(|| anyhow!("Invalid rating value: {value}").into())
}

fn load_photo(entity: models::PhotoEntity) -> Result<Photo> {
    let models::PhotoEntity {
        id,
        purpose,
        storage_path,
        place_id,
        review_id,
        uploaded_by,
        mime_type,
        width,
        height,
        file_size,
        created_at,
    } = entity;
    let purpose = purpose
        .parse::<PhotoPurpose>()
        .map_err(|_| anyhow!("Invalid photo purpose: {purpose}"))?;
    Ok(Photo {
        id: id.into(),
        purpose,
        storage_path,
        place_id: place_id.map(Into::into),
        review_id: review_id.map(Into::into),
        uploaded_by: uploaded_by.into(),
        mime_type,
        width: width.and_then(|w| u32::try_from(w).ok()),
        height: height.and_then(|h| u32::try_from(h).ok()),
        file_size: file_size.and_then(|s| u64::try_from(s).ok()),
        created_at: load_timestamp(created_at),
    })
}

fn load_photos(entities: Vec<models::PhotoEntity>) -> Result<Vec<Photo>> {
    entities.into_iter().map(load_photo).collect()
}
