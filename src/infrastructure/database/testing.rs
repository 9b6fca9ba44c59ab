//! Test fixtures: a migrated in-memory SQLite pool and row seeding.

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

use super::entities::{battery, station};
use super::migrator::Migrator;
use super::SeaOrmRepositoryProvider;
use crate::domain::RepositoryProvider;

/// In-memory databases live as long as their connection, so the pool is
/// pinned to a single connection that never idles out.
pub(crate) async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub(crate) fn repos(db: &DatabaseConnection) -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(db.clone()))
}

pub(crate) async fn seed_battery(
    db: &DatabaseConnection,
    id: &str,
    level: f64,
    is_charging: bool,
    charging_speed: f64,
) {
    battery::ActiveModel {
        id: Set(id.to_string()),
        level: Set(level),
        is_charging: Set(is_charging),
        charging_speed: Set(charging_speed),
    }
    .insert(db)
    .await
    .unwrap();
}

pub(crate) async fn seed_station(db: &DatabaseConnection, name: &str, battery_level: i32) -> i32 {
    let model = station::ActiveModel {
        name: Set(name.to_string()),
        address: Set(format!("{} street 1", name)),
        latitude: Set(41.3111),
        longitude: Set(69.2797),
        battery_level: Set(battery_level),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    model.id
}

pub(crate) async fn battery_row(db: &DatabaseConnection, id: &str) -> Option<battery::Model> {
    battery::Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .unwrap()
}
