//! Per-battery charging activity.
//!
//! One tick reads the level, then either finishes (level at or above the
//! full mark: clear the permit and exit) or raises the level through the
//! permit-guarded increment. Between ticks the activity sleeps for the
//! configured interval. Any store failure, a missing row or a lost permit
//! ends the activity; it never retries and never reports to a caller.
//!
//! Each tick runs under the activity's generation lease. Once the controller
//! admits a newer activity for the same battery, this one exits with
//! `PermitLost` before touching the store.

use std::sync::Arc;

use tracing::{debug, warn};

use super::generation::Lease;
use super::settings::ChargingSettings;
use crate::domain::RepositoryProvider;
use crate::shared::shutdown::ShutdownSignal;

/// Why an activity terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityExit {
    /// Level reached the full mark and the permit was cleared
    Completed,
    /// The permit was cleared by someone else (explicit stop or CRUD write),
    /// or a newer activity was admitted for the same battery
    PermitLost,
    /// The battery row no longer exists
    BatteryGone,
    /// A store statement failed
    StoreFailure,
    /// The process is shutting down; the permit is left as is
    Shutdown,
}

impl ActivityExit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::PermitLost => "permit_lost",
            Self::BatteryGone => "battery_gone",
            Self::StoreFailure => "store_failure",
            Self::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for ActivityExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Level was raised; sleep and tick again
    Advanced,
    Exit(ActivityExit),
}

pub struct ChargingActivity {
    battery_id: String,
    repos: Arc<dyn RepositoryProvider>,
    settings: ChargingSettings,
    lease: Lease,
}

impl ChargingActivity {
    pub fn new(
        battery_id: impl Into<String>,
        repos: Arc<dyn RepositoryProvider>,
        settings: ChargingSettings,
        lease: Lease,
    ) -> Self {
        Self {
            battery_id: battery_id.into(),
            repos,
            settings,
            lease,
        }
    }

    pub fn battery_id(&self) -> &str {
        &self.battery_id
    }

    /// Run one read-update cycle.
    pub async fn tick(&self) -> Tick {
        let Some(_held) = self.lease.hold().await else {
            debug!(
                battery_id = %self.battery_id,
                generation = self.lease.generation(),
                "Superseded by a newer activity"
            );
            return Tick::Exit(ActivityExit::PermitLost);
        };
        let batteries = self.repos.batteries();

        let level = match batteries.read_level(&self.battery_id).await {
            Ok(Some(level)) => level,
            Ok(None) => return Tick::Exit(ActivityExit::BatteryGone),
            Err(e) => {
                warn!(battery_id = %self.battery_id, error = %e, "Failed to read battery level");
                return Tick::Exit(ActivityExit::StoreFailure);
            }
        };

        if self.settings.bounds.is_full(level) {
            return match batteries.release_permit(&self.battery_id).await {
                Ok(_) => {
                    debug!(battery_id = %self.battery_id, level, "Full mark reached");
                    Tick::Exit(ActivityExit::Completed)
                }
                Err(e) => {
                    warn!(battery_id = %self.battery_id, error = %e, "Failed to clear charging flag");
                    Tick::Exit(ActivityExit::StoreFailure)
                }
            };
        }

        match batteries
            .advance_level(&self.battery_id, self.settings.level_cap())
            .await
        {
            Ok(true) => {
                metrics::counter!("charging_ticks_total").increment(1);
                Tick::Advanced
            }
            Ok(false) => Tick::Exit(ActivityExit::PermitLost),
            Err(e) => {
                warn!(battery_id = %self.battery_id, error = %e, "Failed to advance battery level");
                Tick::Exit(ActivityExit::StoreFailure)
            }
        }
    }

    /// Tick until the activity terminates.
    ///
    /// The first tick runs immediately. Shutdown is only observed while
    /// sleeping, so a started statement always completes.
    pub async fn run(self, shutdown: ShutdownSignal) -> ActivityExit {
        loop {
            if let Tick::Exit(reason) = self.tick().await {
                return reason;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.settings.tick_interval) => {}
                _ = shutdown.wait() => return ActivityExit::Shutdown,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::charging::generation::Generations;
    use crate::infrastructure::database::testing::{battery_row, memory_db, repos, seed_battery};

    async fn lease(id: &str) -> Lease {
        Generations::new().lock(id).await.issue()
    }

    async fn activity(db: &sea_orm::DatabaseConnection, id: &str) -> ChargingActivity {
        ChargingActivity::new(id, repos(db), ChargingSettings::default(), lease(id).await)
    }

    #[tokio::test]
    async fn tick_raises_level_by_charging_speed() {
        let db = memory_db().await;
        seed_battery(&db, "B1", 40.0, true, 1.0).await;
        let act = activity(&db, "B1").await;

        for _ in 0..5 {
            assert_eq!(act.tick().await, Tick::Advanced);
        }

        let row = battery_row(&db, "B1").await.unwrap();
        assert_eq!(row.level, 45.0);
        assert!(row.is_charging);
    }

    #[tokio::test]
    async fn reaching_full_mark_clears_the_permit() {
        let db = memory_db().await;
        seed_battery(&db, "B2", 99.5, true, 1.0).await;
        let act = activity(&db, "B2").await;

        assert_eq!(act.tick().await, Tick::Advanced);
        assert_eq!(act.tick().await, Tick::Exit(ActivityExit::Completed));

        let row = battery_row(&db, "B2").await.unwrap();
        assert_eq!(row.level, 100.0);
        assert!(!row.is_charging);
    }

    #[tokio::test]
    async fn overshoot_is_kept_when_clamping_is_off() {
        let db = memory_db().await;
        seed_battery(&db, "B2", 99.5, true, 1.0).await;
        let settings = ChargingSettings {
            clamp_to_full_mark: false,
            ..ChargingSettings::default()
        };
        let act = ChargingActivity::new("B2", repos(&db), settings, lease("B2").await);

        assert_eq!(act.tick().await, Tick::Advanced);
        assert_eq!(act.tick().await, Tick::Exit(ActivityExit::Completed));
        assert_eq!(battery_row(&db, "B2").await.unwrap().level, 100.5);
    }

    #[tokio::test]
    async fn stored_level_above_full_is_left_alone() {
        let db = memory_db().await;
        seed_battery(&db, "B9", 130.0, true, 1.0).await;

        assert_eq!(
            activity(&db, "B9").await.tick().await,
            Tick::Exit(ActivityExit::Completed)
        );
        let row = battery_row(&db, "B9").await.unwrap();
        assert_eq!(row.level, 130.0);
        assert!(!row.is_charging);
    }

    #[tokio::test]
    async fn cleared_flag_ends_the_activity_without_raising_level() {
        let db = memory_db().await;
        seed_battery(&db, "B3", 10.0, false, 5.0).await;

        assert_eq!(
            activity(&db, "B3").await.tick().await,
            Tick::Exit(ActivityExit::PermitLost)
        );
        assert_eq!(battery_row(&db, "B3").await.unwrap().level, 10.0);
    }

    #[tokio::test]
    async fn deleted_battery_ends_the_activity_silently() {
        let db = memory_db().await;
        assert_eq!(
            activity(&db, "gone").await.tick().await,
            Tick::Exit(ActivityExit::BatteryGone)
        );
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_and_keeps_the_flag() {
        let db = memory_db().await;
        seed_battery(&db, "B7", 10.0, true, 1.0).await;
        let settings = ChargingSettings::default().with_tick_interval(Duration::from_secs(60));
        let act = ChargingActivity::new("B7", repos(&db), settings, lease("B7").await);
        let shutdown = ShutdownSignal::new();

        let handle = tokio::spawn(act.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger();

        let reason = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("activity should observe shutdown")
            .unwrap();
        assert_eq!(reason, ActivityExit::Shutdown);

        let row = battery_row(&db, "B7").await.unwrap();
        assert_eq!(row.level, 11.0);
        assert!(row.is_charging);
    }

    #[tokio::test]
    async fn run_finishes_when_full() {
        let db = memory_db().await;
        seed_battery(&db, "B8", 97.0, true, 1.0).await;
        let settings = ChargingSettings::default().with_tick_interval(Duration::from_millis(5));
        let act = ChargingActivity::new("B8", repos(&db), settings, lease("B8").await);

        let reason = tokio::time::timeout(Duration::from_secs(5), act.run(ShutdownSignal::new()))
            .await
            .expect("activity should complete");
        assert_eq!(reason, ActivityExit::Completed);

        let row = battery_row(&db, "B8").await.unwrap();
        assert_eq!(row.level, 100.0);
        assert!(!row.is_charging);
    }

    #[tokio::test]
    async fn superseded_activity_exits_without_writing() {
        let db = memory_db().await;
        seed_battery(&db, "B4", 10.0, true, 1.0).await;
        let generations = Generations::new();
        let settings = ChargingSettings::default();

        let old = ChargingActivity::new(
            "B4",
            repos(&db),
            settings.clone(),
            generations.lock("B4").await.issue(),
        );
        assert_eq!(old.tick().await, Tick::Advanced);

        let new = ChargingActivity::new(
            "B4",
            repos(&db),
            settings,
            generations.lock("B4").await.issue(),
        );
        assert_eq!(old.tick().await, Tick::Exit(ActivityExit::PermitLost));
        assert_eq!(new.tick().await, Tick::Advanced);
        assert_eq!(battery_row(&db, "B4").await.unwrap().level, 12.0);
    }
}
