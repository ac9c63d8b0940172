//! Order fulfillment guard rails and customer trust-tier scoring.
//!
//! The [`orders`] module decides whether an order may move to a new fulfillment status and
//! turns opaque persistence failures into guidance a person can act on. The [`trust`] module
//! scores customers from their order history and keeps an audited trail of every tier change.

pub mod config;
pub mod error;
pub mod orders;
pub mod telemetry;
pub mod trust;
