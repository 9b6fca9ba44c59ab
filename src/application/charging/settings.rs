//! Tunables of the charging loop

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ChargeBounds;

/// What to do at boot with rows whose permit survived a previous process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupRecovery {
    /// Spawn an activity for every battery still marked as charging
    #[default]
    Resume,
    /// Reset every `is_charging` flag to false
    Clear,
}

#[derive(Debug, Clone)]
pub struct ChargingSettings {
    /// Pause between two ticks of an activity
    pub tick_interval: Duration,
    pub bounds: ChargeBounds,
    /// Cap the final increment at the full mark instead of overshooting
    pub clamp_to_full_mark: bool,
    pub startup_recovery: StartupRecovery,
}

impl ChargingSettings {
    /// Upper limit passed to the store's level increment, if any.
    pub fn level_cap(&self) -> Option<f64> {
        self.clamp_to_full_mark.then_some(self.bounds.full_mark)
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

impl Default for ChargingSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            bounds: ChargeBounds::default(),
            clamp_to_full_mark: true,
            startup_recovery: StartupRecovery::Resume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_tick_every_second_and_clamp() {
        let settings = ChargingSettings::default();
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
        assert_eq!(settings.level_cap(), Some(100.0));
    }

    #[test]
    fn no_cap_when_overshoot_is_allowed() {
        let settings = ChargingSettings {
            clamp_to_full_mark: false,
            ..ChargingSettings::default()
        };
        assert_eq!(settings.level_cap(), None);
    }
}
