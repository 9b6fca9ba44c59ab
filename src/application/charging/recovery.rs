//! Startup handling of permits left behind by a previous process.
//!
//! Activities die with the process, so a row may still say
//! `is_charging = true` with nothing charging it. Run this once, before the
//! HTTP listener accepts requests.

use tracing::info;

use super::controller::ChargeController;
use super::settings::StartupRecovery;
use crate::domain::{DomainResult, RepositoryProvider};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub resumed: usize,
    pub cleared: u64,
}

pub async fn recover_interrupted_charging(
    controller: &ChargeController,
    repos: &dyn RepositoryProvider,
) -> DomainResult<RecoveryReport> {
    let mut report = RecoveryReport::default();

    match controller.settings().startup_recovery {
        StartupRecovery::Resume => {
            for battery_id in repos.batteries().find_charging_ids().await? {
                controller.resume(&battery_id).await;
                report.resumed += 1;
            }
        }
        StartupRecovery::Clear => {
            report.cleared = repos.batteries().clear_all_permits().await?;
        }
    }

    info!(
        resumed = report.resumed,
        cleared = report.cleared,
        "Interrupted charging recovered"
    );
    Ok(report)
}
