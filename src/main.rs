//! # Group Admin Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts
//! the cleanup and health services, and runs the Telegram bot.

use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use group_admin_bot::bot::{AppContext, BotHandler, VerifyStorage};
use group_admin_bot::config::Config;
use group_admin_bot::database::connection::DatabaseManager;
use group_admin_bot::keywords::{KeywordResolver, KeywordTable};
use group_admin_bot::services::cleanup::CleanupService;
use group_admin_bot::services::health::{BotStatus, HealthService};
use group_admin_bot::sms::TwilioSender;
use group_admin_bot::utils::logging::log_system_event;
use group_admin_bot::verification::{SystemClock, VerificationRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "group_admin_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Group Admin Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, SMS: {}",
        config.database_url,
        config.http_port,
        if config.twilio.is_some() { "twilio" } else { "not configured" }
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Keyword table and verification registry
    let table = KeywordTable::load(config.keyword_responses_file.as_deref())
        .context("Failed to load keyword responses")?;
    info!("Loaded {} static keyword responses", table.len());

    let sms = Arc::new(TwilioSender::new(config.twilio.clone()));
    let registry = Arc::new(VerificationRegistry::new(sms, Arc::new(SystemClock)));
    let resolver = Arc::new(KeywordResolver::new(db_arc.clone(), table));
    let status = Arc::new(BotStatus::new());

    let ctx = AppContext {
        db: db_arc.as_ref().clone(),
        registry: registry.clone(),
        resolver,
        status: status.clone(),
        code_length: config.verification_code_length,
        ttl_minutes: config.verification_ttl_minutes,
    };

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(ctx);
    info!("Telegram bot initialized successfully");

    // Initialize and start cleanup service
    let mut cleanup_service = CleanupService::new(registry.clone(), config.cleanup_schedule.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create cleanup service: {}", e))?;

    if let Err(e) = cleanup_service.start().await {
        tracing::error!("Failed to start cleanup service: {}", e);
    } else {
        info!("Cleanup service started successfully");
    }

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone(), status, registry);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);
    log_system_event("startup complete", None);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        let storage = VerifyStorage::new();
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = cleanup_service.stop().await {
        tracing::warn!("Error stopping cleanup service: {}", e);
    }

    log_system_event("shutdown", Some("application stopped"));
    Ok(())
}
