//! Start/stop control surface for charging.
//!
//! `start` spawns an activity only after winning the conditional
//! `is_charging: false -> true` update, so at most one activity per battery
//! is admitted no matter how many start requests race. `stop` clears the
//! flag; the running activity notices on its next tick. Winning the update
//! also issues a new generation lease, so an activity left over from before
//! a stop cannot keep charging alongside its successor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn, Instrument};

use super::activity::{ActivityExit, ChargingActivity};
use super::generation::{Generations, Lease};
use super::settings::ChargingSettings;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyCharging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotCharging,
}

pub struct ChargeController {
    repos: Arc<dyn RepositoryProvider>,
    settings: ChargingSettings,
    shutdown: ShutdownSignal,
    generations: Generations,
    /// Live activities in this process. Reporting only; never used to admit.
    active: Arc<AtomicUsize>,
}

impl ChargeController {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        settings: ChargingSettings,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            repos,
            settings,
            shutdown,
            generations: Generations::new(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn settings(&self) -> &ChargingSettings {
        &self.settings
    }

    pub fn active_activities(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub async fn start(&self, battery_id: &str) -> DomainResult<StartOutcome> {
        let batteries = self.repos.batteries();

        match batteries.find_by_id(battery_id).await? {
            None => return Err(DomainError::battery_not_found(battery_id)),
            Some(battery) if battery.is_charging => return Ok(StartOutcome::AlreadyCharging),
            Some(_) => {}
        }

        let slot = self.generations.lock(battery_id).await;
        if batteries.acquire_permit(battery_id).await? {
            let lease = slot.issue();
            info!(
                battery_id = %battery_id,
                generation = lease.generation(),
                "Charging started"
            );
            self.spawn_activity(battery_id, lease);
            return Ok(StartOutcome::Started);
        }
        drop(slot);

        // Another request won the permit, or the row vanished in between.
        match batteries.find_by_id(battery_id).await? {
            None => Err(DomainError::battery_not_found(battery_id)),
            Some(_) => Ok(StartOutcome::AlreadyCharging),
        }
    }

    pub async fn stop(&self, battery_id: &str) -> DomainResult<StopOutcome> {
        let batteries = self.repos.batteries();

        match batteries.find_by_id(battery_id).await? {
            None => return Err(DomainError::battery_not_found(battery_id)),
            Some(battery) if !battery.is_charging => return Ok(StopOutcome::NotCharging),
            Some(_) => {}
        }

        if batteries.release_permit(battery_id).await? {
            info!(battery_id = %battery_id, "Charging stopped");
            return Ok(StopOutcome::Stopped);
        }

        // Completed, stopped concurrently, or deleted in between.
        match batteries.find_by_id(battery_id).await? {
            None => Err(DomainError::battery_not_found(battery_id)),
            Some(_) => Ok(StopOutcome::NotCharging),
        }
    }

    /// Spawn an activity for a battery whose permit is already held.
    ///
    /// Only valid when no activity for `battery_id` exists in this
    /// process, i.e. during startup recovery.
    pub(crate) async fn resume(&self, battery_id: &str) -> JoinHandle<ActivityExit> {
        info!(battery_id = %battery_id, "Resuming interrupted charging");
        let lease = self.generations.lock(battery_id).await.issue();
        self.spawn_activity(battery_id, lease)
    }

    fn spawn_activity(&self, battery_id: &str, lease: Lease) -> JoinHandle<ActivityExit> {
        let activity = ChargingActivity::new(
            battery_id,
            self.repos.clone(),
            self.settings.clone(),
            lease,
        );
        let shutdown = self.shutdown.clone();
        let guard = ActiveGuard::enter(self.active.clone());
        metrics::counter!("charging_activities_started_total").increment(1);

        let span = tracing::info_span!("charging_activity", battery_id = %battery_id);
        tokio::spawn(
            async move {
                let _guard = guard;
                let reason = activity.run(shutdown).await;

                metrics::counter!("charging_activities_finished_total", "reason" => reason.as_str())
                    .increment(1);
                match reason {
                    ActivityExit::StoreFailure => warn!(%reason, "Charging activity aborted"),
                    _ => info!(%reason, "Charging activity finished"),
                }
                reason
            }
            .instrument(span),
        )
    }
}

/// Keeps the live-activity count in step with spawned tasks, including
/// tasks dropped mid-flight at runtime shutdown.
struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    fn enter(active: Arc<AtomicUsize>) -> Self {
        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::gauge!("charging_activities_active").set(now as f64);
        Self { active }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let now = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::gauge!("charging_activities_active").set(now as f64);
    }
}
