use errors::AppError;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};
use tracing::info;

use crate::api::servers::{app_state::AppState, rest};
use crate::bootstrap::config::Config;
use crate::modules::auth::jwt;
use crate::modules::storage::FileStorage;

pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = Config::from_env()?;
    info!("Configuration loaded. Initializing catalog service...");

    let db_conn = setup_database(&config).await?;
    let storage = setup_storage(&config)?;

    jwt::init_jwt_secret(&config.auth.jwt_secret);

    let app_state = AppState::new(db_conn, storage);

    run_server(app_state, config).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

async fn setup_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    info!("Setting up Database");

    let db_config = &config.db;
    let mut opt = ConnectOptions::new(&db_config.url);

    opt.max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .connect_timeout(db_config.connect_timeout)
        .idle_timeout(db_config.idle_timeout)
        .max_lifetime(db_config.max_lifetime)
        .sqlx_logging(db_config.logging_enabled);

    let connection = sea_orm::Database::connect(opt)
        .await
        .map_err(|db_err| AppError::Storage(Box::new(db_err)))?;

    info!("Running database migrations...");
    Migrator::up(&connection, None)
        .await
        .map_err(|db_err| AppError::Migration(Box::new(db_err)))?;

    Ok(connection)
}

fn setup_storage(config: &Config) -> Result<FileStorage, AppError> {
    info!("Setting up file storage at {:?}", config.storage.root);

    FileStorage::new(&config.storage.root).map_err(AppError::Io)
}

async fn run_server(app_state: AppState, config: Config) -> Result<(), AppError> {
    info!("Starting server...");

    tokio::select! {
        result = rest::start(&app_state, &config) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        },
    }

    info!("Application shutdown complete.");
    Ok(())
}
