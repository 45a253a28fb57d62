//! # lampgrid-domain
//!
//! Pure domain model for the lampgrid street-lighting control system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Lights** (individual fixtures with power, brightness, status)
//! - Define **Streets** (ordered groups of lights with derived statistics)
//! - Define **Schedules** (per-street automatic on/off times)
//! - Define **Commands** (`turn_on`, `turn_off`, `set_brightness`) and
//!   per-light command reports for street-wide dispatch
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod command;
pub mod light;
pub mod schedule;
pub mod street;
