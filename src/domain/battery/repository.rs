//! Battery repository interface
//!
//! Besides plain CRUD this is the store the charging core coordinates
//! through. The `is_charging` column is the permit; every permit and level
//! operation is a single conditional statement whose affected-row count
//! tells the caller whether it took effect.

use async_trait::async_trait;

use super::model::{Battery, BatteryChanges};
use crate::domain::DomainResult;

#[async_trait]
pub trait BatteryRepository: Send + Sync {
    // ── CRUD ────────────────────────────────────────────────────

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Battery>>;
    async fn find_all(&self) -> DomainResult<Vec<Battery>>;

    /// Fails with `Conflict` when the id is taken.
    async fn insert(&self, battery: Battery) -> DomainResult<Battery>;

    /// Writes only the columns present in `changes` and returns the row as
    /// stored afterwards. Fails with `NotFound` when the row is absent.
    async fn update(&self, id: &str, changes: BatteryChanges) -> DomainResult<Battery>;

    /// Fails with `NotFound` when the row is absent.
    async fn delete(&self, id: &str) -> DomainResult<()>;

    // ── Charging permit ─────────────────────────────────────────

    /// `SET is_charging = true WHERE id = ? AND is_charging = false`.
    /// Returns `true` only when exactly one row changed.
    async fn acquire_permit(&self, id: &str) -> DomainResult<bool>;

    /// `SET is_charging = false WHERE id = ? AND is_charging = true`.
    /// Returns `true` only when exactly one row changed.
    async fn release_permit(&self, id: &str) -> DomainResult<bool>;

    /// Ids of every row whose permit is currently held.
    async fn find_charging_ids(&self) -> DomainResult<Vec<String>>;

    /// Clears every held permit, returning how many were cleared.
    async fn clear_all_permits(&self) -> DomainResult<u64>;

    // ── Level ───────────────────────────────────────────────────

    /// Current level, or `None` when the row does not exist.
    async fn read_level(&self, id: &str) -> DomainResult<Option<f64>>;

    /// `SET level = level + charging_speed WHERE id = ? AND is_charging = true`,
    /// capped at `cap` inside the same statement when one is given.
    /// Returns `false` when no row changed (permit lost or row gone).
    async fn advance_level(&self, id: &str, cap: Option<f64>) -> DomainResult<bool>;
}
