//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients for the hosted spot table and the address geocoder.

pub mod geocoder;
pub mod store;
