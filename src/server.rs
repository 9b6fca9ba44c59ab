//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database and
//! migrations, startup recovery of interrupted charging, the REST API and
//! graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{recover_interrupted_charging, ChargeController};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::AppState;
use crate::shared::errors::InfraError;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{create_api_router, init_database, SeaOrmRepositoryProvider};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
///
/// ```rust,no_run
/// use bike_charging::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub controller: Arc<ChargeController>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to (resolves port 0).
    pub api_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can be installed once per process; a restart within
/// the same process reuses it.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("Failed to install Prometheus metrics recorder");
            info!("📊 Prometheus metrics recorder installed");
            handle
        })
        .clone()
}

impl ServerHandle {
    /// Start the service.
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Connect to the database and run migrations
    /// 3. Recover charging interrupted by the previous process
    /// 4. Bind and serve the REST API
    pub async fn start(opts: ServerOptions) -> Result<Self, InfraError> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting bike charging service...");
        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        // ── Charging ───────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let settings = app_cfg.charging_settings();
        info!(
            tick_ms = settings.tick_interval.as_millis() as u64,
            full_mark = settings.bounds.full_mark,
            recovery = ?settings.startup_recovery,
            "Charging configured"
        );
        let controller = Arc::new(ChargeController::new(
            repos.clone(),
            settings,
            shutdown.signal(),
        ));

        recover_interrupted_charging(&controller, repos.as_ref()).await?;

        // ── REST API ───────────────────────────────────────────
        let api_router = create_api_router(AppState {
            repos: repos.clone(),
            controller: controller.clone(),
            db: db.clone(),
            started_at: Arc::new(Instant::now()),
            metrics: prometheus,
        });

        let listener = tokio::net::TcpListener::bind(app_cfg.api_address()).await?;
        let api_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            repos,
            controller,
            config: app_cfg,
            api_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting. Charging activities exit
    /// at their next sleep and leave their permits for startup recovery.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let timeout = self.shutdown.grace_period();
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                timeout_secs = timeout.as_secs(),
                "REST API server did not stop in time"
            ),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Bike charging service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down bike charging service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the application config. `RUST_LOG` takes
/// precedence over `logging.level`.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use crate::application::StartupRecovery;
    use crate::domain::Battery;

    fn temp_db_config() -> (AppConfig, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("bike-charging-{}.db", uuid::Uuid::new_v4()));
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = format!("sqlite://{}?mode=rwc", path.display());
        config.charging.tick_interval_ms = 20;
        (config, path)
    }

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_health_and_shuts_down() {
        let (config, path) = temp_db_config();
        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await
        .unwrap();

        let response = http_get(handle.api_addr, "/health").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(handle.is_running());

        handle.shutdown().await;
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn restart_resumes_interrupted_charging() {
        let (mut config, path) = temp_db_config();

        let handle = ServerHandle::start(ServerOptions {
            config: config.clone(),
            auto_migrate: true,
        })
        .await
        .unwrap();
        handle
            .repos
            .batteries()
            .insert(Battery::new("B1", 10.0, 1.0))
            .await
            .unwrap();
        handle.controller.start("B1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown().await;

        // Permit survives shutdown; a resuming restart picks it up.
        let handle = ServerHandle::start(ServerOptions {
            config: config.clone(),
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert_eq!(handle.controller.active_activities(), 1);
        handle.shutdown().await;

        config.charging.startup_recovery = StartupRecovery::Clear;
        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert_eq!(handle.controller.active_activities(), 0);
        let battery = handle
            .repos
            .batteries()
            .find_by_id("B1")
            .await
            .unwrap()
            .unwrap();
        assert!(!battery.is_charging);
        assert!(battery.level > 10.0);
        handle.shutdown().await;

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_binding() {
        let (mut config, _) = temp_db_config();
        config.charging.tick_interval_ms = 0;

        let result = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await;
        assert!(matches!(result, Err(InfraError::Config(_))));
    }
}
