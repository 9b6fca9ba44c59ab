pub mod batteries;
pub mod charging;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod stations;
