//! Core library for the municipal waste management dispatch service.
//!
//! The dispatch module ranks sanitation workers for citizen complaints and
//! assigns complaints to workers through a transactional entity-store seam.
//! The HTTP surface, configuration, and telemetry wiring live alongside it so
//! the `services/api` binary stays a thin shell.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod telemetry;
