//! Storage port — the light registry behind street reads and mutations.

use std::future::Future;

use lampgrid_domain::command::Command;
use lampgrid_domain::error::LampGridError;
use lampgrid_domain::id::{LightId, StreetId};
use lampgrid_domain::light::Light;
use lampgrid_domain::schedule::Schedule;
use lampgrid_domain::street::Street;

/// Repository owning the streets and their lights.
///
/// Implementations must make each mutation atomic with respect to
/// concurrent readers: a reader never observes a half-applied command, and
/// two mutations of the same light are mutually exclusive.
pub trait StreetRepository {
    /// Add a street at provisioning time.
    ///
    /// Fails with an invalid-argument error when the street id is already
    /// taken.
    fn create(&self, street: Street) -> impl Future<Output = Result<Street, LampGridError>> + Send;

    /// Get a snapshot of one street.
    fn get_by_id(
        &self,
        id: &StreetId,
    ) -> impl Future<Output = Result<Option<Street>, LampGridError>> + Send;

    /// Get snapshots of all streets in provisioning order (stable).
    fn get_all(&self) -> impl Future<Output = Result<Vec<Street>, LampGridError>> + Send;

    /// Apply a command to one light under the registry's mutation lock,
    /// returning the updated light.
    ///
    /// Unknown street or light ids fail with `NotFound`; a broken light
    /// fails with `DeviceUnavailable` and is left untouched.
    fn apply_to_light(
        &self,
        street_id: &StreetId,
        light_id: &LightId,
        command: Command,
    ) -> impl Future<Output = Result<Light, LampGridError>> + Send;

    /// Replace a street's schedule triple atomically, returning the
    /// updated street.
    fn update_schedule(
        &self,
        street_id: &StreetId,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Street, LampGridError>> + Send;
}
