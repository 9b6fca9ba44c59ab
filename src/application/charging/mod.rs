//! Battery charging: the start/stop controller and the per-battery
//! background activity it spawns.
//!
//! The `is_charging` column is the only coordination point. The controller
//! flips it with conditional updates; the activity raises `level` only
//! through an update that also requires it. No in-process state decides
//! who may charge.

pub mod activity;
pub mod controller;
pub mod generation;
pub mod recovery;
pub mod settings;

pub use activity::{ActivityExit, ChargingActivity, Tick};
pub use controller::{ChargeController, StartOutcome, StopOutcome};
pub use generation::{Generations, Lease};
pub use recovery::{recover_interrupted_charging, RecoveryReport};
pub use settings::{ChargingSettings, StartupRecovery};
