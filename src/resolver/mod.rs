//! Metadata resolution for notifications
//!
//! Pure lookups, no I/O, never failing:
//! - [`resolve_country`]: portal range label → flag glyph, ISO-ish code,
//!   display name
//! - [`resolve_service`]: message body → best-guess service label
//!
//! Both are backed by ordered association tables kept as data so they can
//! be extended without touching control flow.

mod countries;
mod services;

pub use countries::{resolve_country, CountryInfo};
pub use services::resolve_service;
