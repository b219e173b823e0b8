//! Portal client for the upstream SMS panel
//!
//! The monitor loop consumes the [`SnapshotFetcher`] trait; [`PortalClient`]
//! is the production implementation over reqwest with session-cookie
//! authentication and CSRF token handling. The panel answers its AJAX
//! endpoints with HTML fragments, extracted in [`parse`].

pub mod client;
pub mod parse;
pub mod types;

pub use client::PortalClient;
pub use types::{ArrivalDetail, RangeSnapshot, SnapshotFetcher};
