use std::sync::Arc;

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[derive(Debug, Parser)]
#[command(name = "fintrack", version)]
struct Args {
    /// Settings file, with or without the `.toml` extension.
    #[arg(long, env = "FINTRACK_CONFIG", default_value = "settings")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let settings = settings::Settings::new(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fintrack={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let store = engine::SqlStore::new(db);
    let engine = engine::Engine::builder().store(Arc::new(store)).build()?;

    let identity = server::HttpIdentityProvider::new(
        &settings.identity.url,
        &settings.identity.anon_key,
        &settings.identity.service_key,
    )?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind((bind.as_str(), settings.server.port)).await?;

    let state = server::ServerState::new(engine, Arc::new(identity));
    server::run_with_listener(state, &settings.server.prefix, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
