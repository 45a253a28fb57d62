//! Schedule engine — periodic evaluation of street schedules.
//!
//! A background task wakes at a fixed interval and compares each enabled
//! street schedule against the current local time. When an edge time has
//! passed since its last recorded firing, the engine issues a street-wide
//! command through the command service, so scheduled mutations see exactly
//! the same validation as manual ones.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

use lampgrid_domain::command::Command;
use lampgrid_domain::id::StreetId;
use lampgrid_domain::schedule::Schedule;
use lampgrid_domain::street::Street;

use crate::ports::{Clock, StreetRepository};
use crate::services::command_service::CommandService;

/// Default wall-clock period between schedule evaluations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// When each edge last fired for one street.
///
/// Values are edge *occurrences* (date + edge time), not firing timestamps:
/// an edge is due exactly when its latest occurrence is newer than the one
/// recorded here, which caps every firing at one per calendar day.
#[derive(Debug, Clone, Copy, Default)]
struct FiredEdges {
    last_on: Option<NaiveDateTime>,
    last_off: Option<NaiveDateTime>,
}

/// Background evaluator for per-street automatic schedules.
///
/// The clock is injected so edge evaluation stays deterministic under test;
/// production wiring passes [`SystemClock`](crate::ports::SystemClock).
pub struct ScheduleEngine<R, C> {
    commands: CommandService<R>,
    repo: R,
    clock: C,
    poll_interval: Duration,
    fired: Mutex<HashMap<StreetId, FiredEdges>>,
}

impl<R, C> ScheduleEngine<R, C>
where
    R: StreetRepository + Clone,
    C: Clock,
{
    /// Create a new engine over the given registry and clock.
    pub fn new(repo: R, clock: C, poll_interval: Duration) -> Self {
        Self {
            commands: CommandService::new(repo.clone()),
            repo,
            clock,
            poll_interval,
            fired: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluate schedules forever, once per poll interval.
    ///
    /// Never returns; run this as a spawned task. Errors are logged and
    /// swallowed, since there is no interactive caller at firing time.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Evaluate every street schedule once against the current clock.
    pub async fn tick(&self) {
        let streets = match self.repo.get_all().await {
            Ok(streets) => streets,
            Err(err) => {
                tracing::error!(error = %err, "failed to load streets for schedule evaluation");
                return;
            }
        };

        let now = self.clock.now();
        for street in streets {
            self.evaluate_street(&street, now).await;
        }
    }

    async fn evaluate_street(&self, street: &Street, now: NaiveDateTime) {
        let schedule = street.auto_schedule;
        if !schedule.enabled || schedule.is_degenerate() {
            return;
        }

        for (occurred_at, command) in self.claim_due_edges(&street.id, schedule, now) {
            tracing::info!(
                street = %street.id,
                command = command.name(),
                edge = %occurred_at,
                "firing schedule edge",
            );
            match self.commands.apply_to_street(&street.id, command).await {
                Ok(outcome) if outcome.report.has_failures() => {
                    // The edge stays fired: a broken light must not stall
                    // the rest of the street's schedule.
                    tracing::warn!(
                        street = %street.id,
                        command = command.name(),
                        succeeded = outcome.report.succeeded.len(),
                        failed = outcome.report.failed.len(),
                        "schedule edge partially failed",
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(
                        street = %street.id,
                        command = command.name(),
                        error = %err,
                        "schedule edge dispatch failed",
                    );
                }
            }
        }
    }

    /// Find the edges due for a street and mark them fired, in one step
    /// under the lock, so overlapping ticks cannot claim the same edge.
    ///
    /// Due edges are returned in chronological occurrence order: after a
    /// long pause both edges fire and the later one decides the final
    /// state. An occurrence is at most 24 hours old by construction, which
    /// bounds catch-up after an outage to a single day.
    fn claim_due_edges(
        &self,
        street_id: &StreetId,
        schedule: Schedule,
        now: NaiveDateTime,
    ) -> Vec<(NaiveDateTime, Command)> {
        let mut fired = self.fired.lock().unwrap_or_else(PoisonError::into_inner);
        let record = fired.entry(street_id.clone()).or_default();

        let mut due = Vec::new();
        let on_at = latest_occurrence(schedule.on_time, now);
        if record.last_on.is_none_or(|last| last < on_at) {
            record.last_on = Some(on_at);
            due.push((on_at, Command::TurnOn));
        }
        let off_at = latest_occurrence(schedule.off_time, now);
        if record.last_off.is_none_or(|last| last < off_at) {
            record.last_off = Some(off_at);
            due.push((off_at, Command::TurnOff));
        }
        due.sort_by_key(|(at, _)| *at);
        due
    }
}

/// The most recent occurrence of an edge time: today if already passed,
/// otherwise yesterday.
fn latest_occurrence(edge: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(edge);
    if today <= now {
        today
    } else {
        today - chrono::Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lampgrid_domain::error::{LampGridError, NotFoundError};
    use lampgrid_domain::id::LightId;
    use lampgrid_domain::light::{Light, LightStatus};
    use std::future::Future;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct InMemoryStreetRepo {
        store: Arc<Mutex<Vec<Street>>>,
    }

    impl InMemoryStreetRepo {
        fn with(streets: Vec<Street>) -> Self {
            Self {
                store: Arc::new(Mutex::new(streets)),
            }
        }

        fn light_snapshot(&self, street_id: &str, light_id: &str) -> Light {
            let store = self.store.lock().unwrap();
            store
                .iter()
                .find(|street| street.id.as_str() == street_id)
                .and_then(|street| street.light(&LightId::from(light_id)))
                .cloned()
                .unwrap()
        }
    }

    impl StreetRepository for InMemoryStreetRepo {
        fn create(
            &self,
            street: Street,
        ) -> impl Future<Output = Result<Street, LampGridError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.push(street.clone());
            async move { Ok(street) }
        }

        fn get_by_id(
            &self,
            id: &StreetId,
        ) -> impl Future<Output = Result<Option<Street>, LampGridError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.iter().find(|street| &street.id == id).cloned();
            async move { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Street>, LampGridError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.clone();
            async move { Ok(result) }
        }

        fn apply_to_light(
            &self,
            street_id: &StreetId,
            light_id: &LightId,
            command: Command,
        ) -> impl Future<Output = Result<Light, LampGridError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = store
                .iter_mut()
                .find(|street| &street.id == street_id)
                .ok_or_else(|| {
                    NotFoundError {
                        entity: "Street",
                        id: street_id.to_string(),
                    }
                    .into()
                })
                .and_then(|street| {
                    street
                        .light_mut(light_id)
                        .ok_or_else(|| {
                            NotFoundError {
                                entity: "Light",
                                id: light_id.to_string(),
                            }
                            .into()
                        })
                        .and_then(|light| light.apply(command).map(|()| light.clone()))
                });
            async move { result }
        }

        fn update_schedule(
            &self,
            street_id: &StreetId,
            schedule: Schedule,
        ) -> impl Future<Output = Result<Street, LampGridError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = store
                .iter_mut()
                .find(|street| &street.id == street_id)
                .ok_or_else(|| {
                    NotFoundError {
                        entity: "Street",
                        id: street_id.to_string(),
                    }
                    .into()
                })
                .map(|street| {
                    street.auto_schedule = schedule;
                    street.clone()
                });
            async move { result }
        }
    }

    #[derive(Clone)]
    struct FixedClock {
        now: Arc<Mutex<NaiveDateTime>>,
    }

    impl FixedClock {
        fn at(datetime: &str) -> Self {
            Self {
                now: Arc::new(Mutex::new(parse(datetime))),
            }
        }

        fn set(&self, datetime: &str) {
            *self.now.lock().unwrap() = parse(datetime);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            *self.now.lock().unwrap()
        }
    }

    fn parse(datetime: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M").unwrap()
    }

    fn light(id: &str, power: bool, brightness: u8, status: LightStatus) -> Light {
        Light::builder()
            .id(id)
            .power(power)
            .brightness(brightness)
            .status(status)
            .build()
            .unwrap()
    }

    /// One street, dusk-to-dawn schedule wrapping midnight.
    fn elm_street(schedule: Schedule) -> Street {
        Street::builder()
            .id("elm")
            .name("Elm Street")
            .light(light("elm_1", false, 0, LightStatus::Working))
            .light(light("elm_2", false, 0, LightStatus::Working))
            .auto_schedule(schedule)
            .build()
            .unwrap()
    }

    fn dusk_to_dawn() -> Schedule {
        Schedule::parse(true, "18:00", "06:00").unwrap()
    }

    fn make_engine(
        streets: Vec<Street>,
        clock: FixedClock,
    ) -> (
        ScheduleEngine<InMemoryStreetRepo, FixedClock>,
        InMemoryStreetRepo,
    ) {
        let repo = InMemoryStreetRepo::with(streets);
        let engine = ScheduleEngine::new(repo.clone(), clock, DEFAULT_POLL_INTERVAL);
        (engine, repo)
    }

    #[tokio::test]
    async fn should_fire_turn_on_when_crossing_on_time() {
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![elm_street(dusk_to_dawn())], clock.clone());

        // Baseline tick settles the catch-up firings at noon (last edge
        // was 06:00 off).
        engine.tick().await;
        assert!(!repo.light_snapshot("elm", "elm_1").power);

        clock.set("2024-03-01 18:00");
        engine.tick().await;
        assert!(repo.light_snapshot("elm", "elm_1").power);
        assert!(repo.light_snapshot("elm", "elm_2").power);
    }

    #[tokio::test]
    async fn should_fire_each_edge_at_most_once_per_day() {
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![elm_street(dusk_to_dawn())], clock.clone());
        engine.tick().await;

        clock.set("2024-03-01 18:00");
        engine.tick().await;
        assert!(repo.light_snapshot("elm", "elm_1").power);

        // Counter the firing by hand; a second wake in the same minute must
        // not re-issue the edge.
        repo.apply_to_light(
            &StreetId::from("elm"),
            &LightId::from("elm_1"),
            Command::TurnOff,
        )
        .await
        .unwrap();

        clock.set("2024-03-01 18:00");
        engine.tick().await;
        assert!(!repo.light_snapshot("elm", "elm_1").power);
    }

    #[tokio::test]
    async fn should_fire_again_on_the_next_day() {
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![elm_street(dusk_to_dawn())], clock.clone());
        engine.tick().await;

        clock.set("2024-03-01 18:00");
        engine.tick().await;
        clock.set("2024-03-02 06:00");
        engine.tick().await;
        assert!(!repo.light_snapshot("elm", "elm_1").power);

        clock.set("2024-03-02 18:00");
        engine.tick().await;
        assert!(repo.light_snapshot("elm", "elm_1").power);
    }

    #[tokio::test]
    async fn should_never_fire_degenerate_schedule() {
        let schedule = Schedule::parse(true, "07:15", "07:15").unwrap();
        let clock = FixedClock::at("2024-03-01 07:15");
        let (engine, repo) = make_engine(vec![elm_street(schedule)], clock.clone());

        engine.tick().await;
        clock.set("2024-03-02 07:16");
        engine.tick().await;

        assert!(!repo.light_snapshot("elm", "elm_1").power);
    }

    #[tokio::test]
    async fn should_never_fire_disabled_schedule() {
        let schedule = Schedule::parse(false, "18:00", "06:00").unwrap();
        let clock = FixedClock::at("2024-03-01 18:30");
        let (engine, repo) = make_engine(vec![elm_street(schedule)], clock);

        engine.tick().await;

        assert!(!repo.light_snapshot("elm", "elm_1").power);
    }

    #[tokio::test]
    async fn should_stop_firing_after_schedule_disabled_mid_day() {
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![elm_street(dusk_to_dawn())], clock.clone());
        engine.tick().await;

        clock.set("2024-03-01 18:00");
        engine.tick().await;
        assert!(repo.light_snapshot("elm", "elm_1").power);

        // Operator switches the automation off; lights stay as they are.
        repo.update_schedule(
            &StreetId::from("elm"),
            Schedule::parse(false, "18:00", "06:00").unwrap(),
        )
        .await
        .unwrap();

        clock.set("2024-03-02 06:00");
        engine.tick().await;
        assert!(repo.light_snapshot("elm", "elm_1").power);
    }

    #[tokio::test]
    async fn should_catch_up_missed_edges_in_chronological_order() {
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![elm_street(dusk_to_dawn())], clock.clone());
        engine.tick().await;

        // Process pauses through both edges; the next wake fires on (18:00)
        // then off (06:00), so the later edge decides the final state. The
        // restored default brightness proves the on edge really ran.
        clock.set("2024-03-02 07:00");
        engine.tick().await;

        let light = repo.light_snapshot("elm", "elm_1");
        assert!(!light.power);
        assert_eq!(light.brightness, 100);
    }

    #[tokio::test]
    async fn should_mark_edge_fired_despite_partial_failure() {
        let street = Street::builder()
            .id("oak")
            .name("Oak Street")
            .light(light("oak_1", false, 0, LightStatus::Working))
            .light(light("oak_2", false, 0, LightStatus::Broken))
            .auto_schedule(dusk_to_dawn())
            .build()
            .unwrap();
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![street], clock.clone());
        engine.tick().await;

        clock.set("2024-03-01 18:00");
        engine.tick().await;
        assert!(repo.light_snapshot("oak", "oak_1").power);
        assert!(!repo.light_snapshot("oak", "oak_2").power);

        // Edge is spent even though one light failed.
        repo.apply_to_light(
            &StreetId::from("oak"),
            &LightId::from("oak_1"),
            Command::TurnOff,
        )
        .await
        .unwrap();
        clock.set("2024-03-01 18:01");
        engine.tick().await;
        assert!(!repo.light_snapshot("oak", "oak_1").power);
    }

    #[tokio::test]
    async fn should_evaluate_streets_independently() {
        let other = Street::builder()
            .id("birch")
            .name("Birch Avenue")
            .light(light("birch_1", false, 0, LightStatus::Working))
            .auto_schedule(Schedule::parse(true, "20:00", "05:00").unwrap())
            .build()
            .unwrap();
        let clock = FixedClock::at("2024-03-01 12:00");
        let (engine, repo) = make_engine(vec![elm_street(dusk_to_dawn()), other], clock.clone());
        engine.tick().await;

        clock.set("2024-03-01 18:30");
        engine.tick().await;
        assert!(repo.light_snapshot("elm", "elm_1").power);
        assert!(!repo.light_snapshot("birch", "birch_1").power);

        clock.set("2024-03-01 20:00");
        engine.tick().await;
        assert!(repo.light_snapshot("birch", "birch_1").power);
    }

    #[test]
    fn should_resolve_latest_occurrence_across_midnight() {
        let edge = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let before = parse("2024-03-01 12:00");
        let after = parse("2024-03-01 19:00");

        assert_eq!(latest_occurrence(edge, before), parse("2024-02-29 18:00"));
        assert_eq!(latest_occurrence(edge, after), parse("2024-03-01 18:00"));
        assert_eq!(
            latest_occurrence(edge, parse("2024-03-01 18:00")),
            parse("2024-03-01 18:00")
        );
    }
}
