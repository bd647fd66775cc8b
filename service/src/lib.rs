use config::Config;
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;
use webhook_auth::ShaSignatureVerifier;

pub mod config;
pub mod logging;

/// PostgreSQL schema holding all deployer tables.
pub const DB_SCHEMA: &str = "deployer";

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Database pool config: max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
        config.db_max_connections,
        config.db_min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
        config.db_idle_timeout_secs,
        config.db_max_lifetime_secs,
    );

    let mut opt = ConnectOptions::new::<&str>(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info)
        .set_schema_search_path(DB_SCHEMA); // Setting default PostgreSQL schema

    let db = Database::connect(opt).await?;

    Ok(db)
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub signature_verifier: Arc<ShaSignatureVerifier>,
}

impl AppState {
    /// Builds the shared state. The signature verifier is keyed once here from
    /// the configured webhook secret and never rebuilt.
    pub fn new(app_config: Config, db: &Arc<DatabaseConnection>) -> Self {
        let signature_verifier = Arc::new(ShaSignatureVerifier::new(app_config.webhook_secret()));

        Self {
            database_connection: Arc::clone(db),
            config: app_config,
            signature_verifier,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }

    pub fn signature_verifier(&self) -> &ShaSignatureVerifier {
        self.signature_verifier.as_ref()
    }
}
