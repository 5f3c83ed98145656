//! Depot API Server
//!
//! Main entry point for the Depot backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use depot_api::{AppState, create_router};
use depot_core::avatar::{AvatarService, UploadPolicy};
use depot_core::container::ContainerRegistry;
use depot_core::identity::SupabaseAuthClient;
use depot_core::storage::{StorageConfig, StorageService};
use depot_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "depot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create identity gateway
    let identity = SupabaseAuthClient::new(&config.supabase.url, &config.supabase.service_role_key)
        .context("Failed to create Supabase auth client")?;
    info!(url = %config.supabase.url, "Identity provider configured");

    // Create object store
    let storage = StorageConfig::from_app_config(&config)
        .and_then(StorageService::from_config)
        .context("Failed to initialize object storage")?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Object storage configured"
    );

    let policy = UploadPolicy::from(&config.upload);
    info!(
        require_auth = policy.require_auth,
        key_strategy = ?policy.key_strategy,
        max_file_size = policy.max_file_size,
        "Avatar upload policy"
    );

    // Create application state
    let state = AppState {
        containers: Arc::new(ContainerRegistry::seeded()),
        identity: Arc::new(identity),
        avatars: Arc::new(AvatarService::new(Arc::new(storage), policy)),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
