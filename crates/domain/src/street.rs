//! Street — an ordered group of lights with derived rollup statistics.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidArgumentError, LampGridError};
use crate::id::{LightId, StreetId};
use crate::light::Light;
use crate::schedule::Schedule;

/// A street owning an ordered sequence of lights and one schedule.
///
/// Lights are stored in provisioning order; that order is the stable
/// iteration order for reads and for street-wide command dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Street {
    pub id: StreetId,
    pub name: String,
    pub lights: Vec<Light>,
    pub auto_schedule: Schedule,
}

/// Rollup statistics derived from a street's current lights.
///
/// Always recomputed from the snapshot at hand, never stored: the schedule
/// engine and manual commands mutate state asynchronously, so a cached
/// value could go stale between reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightStats {
    pub total_lights: usize,
    pub working_lights: usize,
    pub broken_lights: usize,
    /// `round(working / total * 100)`, defined as 0 for an empty street.
    pub efficiency: u8,
}

impl Street {
    /// Create a builder for constructing a [`Street`].
    #[must_use]
    pub fn builder() -> StreetBuilder {
        StreetBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::InvalidArgument`] when `id` or `name` is
    /// empty, when any owned light is invalid, or when two lights share an
    /// id.
    pub fn validate(&self) -> Result<(), LampGridError> {
        if self.id.is_empty() {
            return Err(InvalidArgumentError::EmptyId.into());
        }
        if self.name.is_empty() {
            return Err(InvalidArgumentError::EmptyName.into());
        }
        for (index, light) in self.lights.iter().enumerate() {
            light.validate()?;
            if self.lights[..index].iter().any(|other| other.id == light.id) {
                return Err(InvalidArgumentError::DuplicateId(light.id.to_string()).into());
            }
        }
        Ok(())
    }

    /// Compute rollup statistics from the current light states.
    #[must_use]
    pub fn stats(&self) -> LightStats {
        let total = self.lights.len();
        let working = self.lights.iter().filter(|light| light.is_lit()).count();
        let broken = self
            .lights
            .iter()
            .filter(|light| !light.status.is_working())
            .count();
        let efficiency = if total == 0 {
            0
        } else {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                (working as f64 / total as f64 * 100.0).round() as u8
            }
        };
        LightStats {
            total_lights: total,
            working_lights: working,
            broken_lights: broken,
            efficiency,
        }
    }

    /// Look up a light by id.
    #[must_use]
    pub fn light(&self, id: &LightId) -> Option<&Light> {
        self.lights.iter().find(|light| &light.id == id)
    }

    /// Mutable lookup of a light by id.
    pub fn light_mut(&mut self, id: &LightId) -> Option<&mut Light> {
        self.lights.iter_mut().find(|light| &light.id == id)
    }

    /// The owned light ids in stored (provisioning) order.
    #[must_use]
    pub fn light_ids(&self) -> Vec<LightId> {
        self.lights.iter().map(|light| light.id.clone()).collect()
    }
}

/// Step-by-step builder for [`Street`].
#[derive(Debug, Default)]
pub struct StreetBuilder {
    id: Option<StreetId>,
    name: Option<String>,
    lights: Vec<Light>,
    auto_schedule: Option<Schedule>,
}

impl StreetBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<StreetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one light, preserving insertion order.
    #[must_use]
    pub fn light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    #[must_use]
    pub fn lights(mut self, lights: Vec<Light>) -> Self {
        self.lights = lights;
        self
    }

    #[must_use]
    pub fn auto_schedule(mut self, schedule: Schedule) -> Self {
        self.auto_schedule = Some(schedule);
        self
    }

    /// Consume the builder, validate, and return a [`Street`].
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::InvalidArgument`] if `id` or `name` is
    /// missing or invariants fail.
    pub fn build(self) -> Result<Street, LampGridError> {
        let street = Street {
            id: self.id.unwrap_or_else(|| StreetId::from("")),
            name: self.name.unwrap_or_default(),
            lights: self.lights,
            auto_schedule: self.auto_schedule.unwrap_or_default(),
        };
        street.validate()?;
        Ok(street)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightStatus;

    fn light(id: &str, power: bool, status: LightStatus) -> Light {
        Light::builder()
            .id(id)
            .power(power)
            .brightness(if power { 100 } else { 0 })
            .status(status)
            .build()
            .unwrap()
    }

    fn street_with(lights: Vec<Light>) -> Street {
        Street::builder()
            .id("elm")
            .name("Elm Street")
            .lights(lights)
            .build()
            .unwrap()
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Street::builder().id("elm").build();
        assert!(matches!(result, Err(LampGridError::InvalidArgument(_))));
    }

    #[test]
    fn should_reject_duplicate_light_ids() {
        let result = Street::builder()
            .id("elm")
            .name("Elm Street")
            .light(light("elm_1", true, LightStatus::Working))
            .light(light("elm_1", false, LightStatus::Working))
            .build();
        assert!(matches!(
            result,
            Err(LampGridError::InvalidArgument(
                InvalidArgumentError::DuplicateId(_)
            ))
        ));
    }

    #[test]
    fn should_compute_stats_from_current_lights() {
        let street = street_with(vec![
            light("elm_1", true, LightStatus::Working),
            light("elm_2", true, LightStatus::Working),
            light("elm_3", false, LightStatus::Working),
            light("elm_4", true, LightStatus::Broken),
        ]);

        let stats = street.stats();
        assert_eq!(stats.total_lights, 4);
        assert_eq!(stats.working_lights, 2);
        assert_eq!(stats.broken_lights, 1);
        assert_eq!(stats.efficiency, 50);
    }

    #[test]
    fn should_round_efficiency_to_nearest_percent() {
        let street = street_with(vec![
            light("elm_1", true, LightStatus::Working),
            light("elm_2", false, LightStatus::Working),
            light("elm_3", false, LightStatus::Working),
        ]);
        // 1/3 → 33.33… → 33
        assert_eq!(street.stats().efficiency, 33);

        let street = street_with(vec![
            light("elm_1", true, LightStatus::Working),
            light("elm_2", true, LightStatus::Working),
            light("elm_3", false, LightStatus::Working),
        ]);
        // 2/3 → 66.67… → 67
        assert_eq!(street.stats().efficiency, 67);
    }

    #[test]
    fn should_report_zero_efficiency_for_empty_street() {
        let street = street_with(vec![]);
        let stats = street.stats();
        assert_eq!(stats.total_lights, 0);
        assert_eq!(stats.efficiency, 0);
    }

    #[test]
    fn should_preserve_light_order() {
        let street = street_with(vec![
            light("elm_2", true, LightStatus::Working),
            light("elm_1", true, LightStatus::Working),
        ]);
        let ids = street.light_ids();
        assert_eq!(ids, vec![LightId::from("elm_2"), LightId::from("elm_1")]);
    }

    #[test]
    fn should_find_light_by_id() {
        let street = street_with(vec![light("elm_1", true, LightStatus::Working)]);
        assert!(street.light(&LightId::from("elm_1")).is_some());
        assert!(street.light(&LightId::from("elm_9")).is_none());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let street = street_with(vec![light("elm_1", true, LightStatus::Working)]);
        let json = serde_json::to_string(&street).unwrap();
        let parsed: Street = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, street.id);
        assert_eq!(parsed.lights.len(), 1);
    }
}
