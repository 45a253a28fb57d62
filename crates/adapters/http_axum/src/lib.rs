//! # lampgrid-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON REST API the lighting dashboard polls
//!   (`/api/streets`, street and light commands, schedule updates)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map domain errors onto stable machine-readable error bodies
//!
//! Every write endpoint answers with the post-mutation state, so a client
//! never needs a follow-up read to refresh its view.
//!
//! ## Dependency rule
//! Depends on `lampgrid-app` (for port traits and services) and
//! `lampgrid-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
