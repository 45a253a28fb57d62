//! # lampgrid-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StreetRepository` — the light registry: street reads, atomic
//!     per-light command application, schedule replacement
//!   - `Clock` — local wall-clock time, injectable for tests
//! - Define **driving/inbound ports** as use-case structs:
//!   - `StreetService` — list/get streets, replace schedules
//!   - `CommandService` — the command processor: single-light and
//!     street-wide dispatch with per-light reporting
//!   - `ScheduleEngine` — periodic evaluation of street schedules,
//!     firing edges through the command processor
//! - Orchestrate domain objects without knowing *how* storage or IO works
//!
//! ## Dependency rule
//! Depends on `lampgrid-domain` only (plus `tokio::time` for the engine
//! task). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod ports;
pub mod schedule_engine;
pub mod services;
