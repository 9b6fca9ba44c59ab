//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::battery::BatteryRepository;
use super::station::StationRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let battery = repos.batteries().find_by_id("B1").await?;
///     let stations = repos.stations().find_all().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn batteries(&self) -> &dyn BatteryRepository;
    fn stations(&self) -> &dyn StationRepository;
}
