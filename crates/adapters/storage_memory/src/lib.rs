//! # lampgrid-adapter-storage-memory
//!
//! In-memory light registry.
//!
//! ## Responsibilities
//! - Implement the [`StreetRepository`](lampgrid_app::ports::StreetRepository)
//!   port over a lock-serialized in-process store
//! - Make every mutation atomic with respect to concurrent readers
//! - Preserve provisioning order for stable street and light iteration
//!
//! ## Dependency rule
//! Depends on `lampgrid-app` (for port traits) and `lampgrid-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

pub mod street_repo;

pub use street_repo::InMemoryStreetRepository;
