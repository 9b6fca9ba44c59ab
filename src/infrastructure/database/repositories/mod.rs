//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod battery_repository;
pub mod repository_provider;
pub mod station_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

/// Every driver failure surfaces as a transient store error.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Store(e.to_string())
}
