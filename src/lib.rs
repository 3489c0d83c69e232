//! Client-side core of a collaborative dashboard builder: a typed REST
//! client, a realtime collaboration client, the widget catalog, grid editing
//! and an auth gate over an injected identity provider.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use error::{ApiError, GridError, RealtimeError};
