#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # famspot-entities
//!
//! Reusable, agnostic domain entities for famspot.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod age_band;
pub mod category;
pub mod feature;
pub mod geo;
pub mod id;
pub mod photo;
pub mod place;
pub mod rating;
pub mod review;
pub mod stats;
pub mod time;
pub mod user;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
