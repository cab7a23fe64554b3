use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use member_visits::api;
use member_visits::auth::AuthService;
use member_visits::config::{AuthMode, Config};
use member_visits::hook::LoginHook;
use member_visits::hook_server;
use member_visits::members::InMemoryMemberDirectory;
use member_visits::storage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let store = storage::connect(&config.database).await?;

    // Create the visit table if needed
    info!("Initializing database...");
    store.init().await?;
    info!("Database initialized successfully");

    // Member directory
    let directory = match config.members.seed_file.as_deref() {
        Some(path) => {
            let directory = InMemoryMemberDirectory::from_json_file(path)?;
            info!("Loaded {} member profiles from {}", directory.len(), path);
            directory
        }
        None => {
            info!("Member directory starts empty, waiting for host sync");
            InMemoryMemberDirectory::new()
        }
    };
    let directory = Arc::new(directory);

    let auth_service = Arc::new(AuthService::new(config.auth.clone()));
    match config.auth.mode {
        AuthMode::None => {
            info!("🔓 Authentication is disabled - all requests are trusted");
        }
        AuthMode::ApiKey => {
            info!(
                "🔐 API key authentication enabled ({} keys configured)",
                config.auth.api_keys.len()
            );
        }
    }

    // Create routers
    let api_router = api::create_api_router(
        Arc::clone(&store),
        directory,
        Arc::clone(&auth_service),
        config.report.clone(),
    );
    let login_hook = Arc::new(LoginHook::new(Arc::clone(&store)));
    let hook_router = hook_server::create_hook_router(login_hook, auth_service);

    // Start API server
    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!("   - Report available at http://{}/api/report", api_addr);

    // Start hook server
    let hook_addr = format!("{}:{}", config.hook_server.host, config.hook_server.port);
    let hook_listener = tokio::net::TcpListener::bind(&hook_addr).await?;
    info!("🚀 Login hook listening on http://{}/login", hook_addr);

    // Run both servers concurrently
    tokio::try_join!(
        axum::serve(api_listener, api_router),
        axum::serve(hook_listener, hook_router),
    )?;

    Ok(())
}
