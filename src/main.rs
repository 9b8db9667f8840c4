use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lotr_favorites_api::auth::{generate_jwt, Claims, TokenVerifier};
use lotr_favorites_api::config::AppConfig;
use lotr_favorites_api::database::{DatabaseManager, PgFavoritesRepository};
use lotr_favorites_api::upstream::OneApiClient;
use lotr_favorites_api::{router, AppState};

#[derive(Parser)]
#[command(name = "lotr-favorites-api")]
#[command(about = "Authenticated gateway over The One API with per-user favorites")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Print a signed development token for a user id")]
    Token {
        #[arg(long, help = "User id to place in the token subject")]
        user: String,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, LOTR_API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Token { user, hours } => {
            let hours = hours.unwrap_or(config.security.jwt_expiry_hours);
            let token = generate_jwt(&config.security.jwt_secret, &Claims::new(user, hours)?)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    tracing::info!("Starting LOTR Favorites API in {:?} mode", config.environment);

    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        database.run_migrations().await?;
    }

    let verifier = TokenVerifier::from_config(&config.security)?;
    let upstream = OneApiClient::new(&config.upstream)?;
    let favorites = PgFavoritesRepository::new(database.pool().clone());

    let state = AppState::new(verifier, Arc::new(upstream), Arc::new(favorites));
    let app = router(state, &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("LOTR Favorites API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
