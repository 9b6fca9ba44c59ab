pub mod charging;

// Re-export key types for convenience
pub use charging::{
    recover_interrupted_charging, ActivityExit, ChargeController, ChargingActivity,
    ChargingSettings, RecoveryReport, StartOutcome, StartupRecovery, StopOutcome,
};
