//! # Parkering API
//!
//! HTTP adapter over a single [`parkering_core::ParkingLot`].
//!
//! ### Components:
//! - `dto`: request/response bodies and boundary validation
//! - `error`: error-to-status mapping
//! - `service`: the shared, mutex-guarded lot
//! - `routes`: axum router and handlers

pub mod dto;
pub mod error;
pub mod routes;
pub mod service;

pub use error::ApiError;
pub use routes::{metrics_router, router};
pub use service::{ClearSelector, ParkingService};
