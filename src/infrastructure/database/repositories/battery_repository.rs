//! SeaORM implementation of BatteryRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, UpdateResult,
};
use tracing::{debug, info};

use crate::domain::{Battery, BatteryChanges, BatteryRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::battery;

use super::db_err;

fn model_to_domain(m: battery::Model) -> Battery {
    Battery {
        id: m.id,
        level: m.level,
        is_charging: m.is_charging,
        charging_speed: m.charging_speed,
    }
}

pub struct SeaOrmBatteryRepository {
    db: DatabaseConnection,
}

impl SeaOrmBatteryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn set_permit(&self, id: &str, from: bool, to: bool) -> DomainResult<bool> {
        let result: UpdateResult = battery::Entity::update_many()
            .col_expr(battery::Column::IsCharging, Expr::value(to))
            .filter(battery::Column::Id.eq(id))
            .filter(battery::Column::IsCharging.eq(from))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected == 1)
    }
}

#[async_trait]
impl BatteryRepository for SeaOrmBatteryRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Battery>> {
        let model = battery::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Battery>> {
        let models = battery::Entity::find()
            .order_by_asc(battery::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn insert(&self, b: Battery) -> DomainResult<Battery> {
        let model = battery::ActiveModel {
            id: Set(b.id.clone()),
            level: Set(b.level),
            is_charging: Set(b.is_charging),
            charging_speed: Set(b.charging_speed),
        };

        match model.insert(&self.db).await {
            Ok(saved) => {
                info!(battery_id = %saved.id, "Battery created");
                Ok(model_to_domain(saved))
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(DomainError::Conflict(format!(
                    "battery {} already exists",
                    b.id
                ))),
                _ => Err(db_err(e)),
            },
        }
    }

    async fn update(&self, id: &str, changes: BatteryChanges) -> DomainResult<Battery> {
        if !changes.is_empty() {
            let mut query = battery::Entity::update_many().filter(battery::Column::Id.eq(id));
            if let Some(level) = changes.level {
                query = query.col_expr(battery::Column::Level, Expr::value(level));
            }
            if let Some(is_charging) = changes.is_charging {
                query = query.col_expr(battery::Column::IsCharging, Expr::value(is_charging));
            }
            if let Some(speed) = changes.charging_speed {
                query = query.col_expr(battery::Column::ChargingSpeed, Expr::value(speed));
            }

            let result: UpdateResult = query.exec(&self.db).await.map_err(db_err)?;
            if result.rows_affected == 0 {
                return Err(DomainError::battery_not_found(id));
            }
            info!(battery_id = %id, "Battery updated");
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::battery_not_found(id))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = battery::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::battery_not_found(id));
        }
        info!(battery_id = %id, "Battery deleted");
        Ok(())
    }

    async fn acquire_permit(&self, id: &str) -> DomainResult<bool> {
        self.set_permit(id, false, true).await
    }

    async fn release_permit(&self, id: &str) -> DomainResult<bool> {
        self.set_permit(id, true, false).await
    }

    async fn find_charging_ids(&self) -> DomainResult<Vec<String>> {
        battery::Entity::find()
            .select_only()
            .column(battery::Column::Id)
            .filter(battery::Column::IsCharging.eq(true))
            .order_by_asc(battery::Column::Id)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn clear_all_permits(&self) -> DomainResult<u64> {
        let result: UpdateResult = battery::Entity::update_many()
            .col_expr(battery::Column::IsCharging, Expr::value(false))
            .filter(battery::Column::IsCharging.eq(true))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn read_level(&self, id: &str) -> DomainResult<Option<f64>> {
        battery::Entity::find_by_id(id)
            .select_only()
            .column(battery::Column::Level)
            .into_tuple::<f64>()
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn advance_level(&self, id: &str, cap: Option<f64>) -> DomainResult<bool> {
        let raised: SimpleExpr =
            Expr::col(battery::Column::Level).add(Expr::col(battery::Column::ChargingSpeed));

        let next: SimpleExpr = match cap {
            Some(cap) => Expr::case(Expr::expr(raised.clone()).gt(cap), Expr::val(cap))
                .finally(raised)
                .into(),
            None => raised,
        };

        let result: UpdateResult = battery::Entity::update_many()
            .col_expr(battery::Column::Level, next)
            .filter(battery::Column::Id.eq(id))
            .filter(battery::Column::IsCharging.eq(true))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        debug!(battery_id = %id, rows = result.rows_affected, "Level advance");
        Ok(result.rows_affected == 1)
    }
}
