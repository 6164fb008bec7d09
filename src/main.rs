use std::sync::Arc;

use serenity::all::{Command, Interaction};
use serenity::async_trait;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod admin;
mod api;
mod commands;
mod config;
mod db;
mod models;
mod services;
mod utils;

use crate::admin::AdminSurface;
use crate::api::rugplay::{RugplayClient, TransferRelay};
use crate::config::Config;
use crate::db::CredentialStore;
use crate::services::Dispatcher;

struct Handler {
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        match Command::set_global_commands(&ctx.http, commands::create_commands()).await {
            Ok(registered) => info!("Registered {} slash commands", registered.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            commands::handle_interaction(&ctx, &command, &self.dispatcher).await;
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rugplay_claim_bot=debug,serenity=warn")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("🤖 Starting Rugplay claim bot...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    if let Some(owner) = config.bot_owner_id {
        info!("Bot operator: {}", owner);
    }
    if config.default_credential.is_some() {
        info!("Default Rugplay cookie configured; unregistered guilds will use it");
    } else {
        info!("No default Rugplay cookie; guilds must run /register_cookie");
    }

    // Initialize database
    info!("Initializing database...");
    let store = match db::init_db(&config.database_url).await {
        Ok(pool) => {
            info!("Database initialized successfully");
            Arc::new(CredentialStore::new(pool))
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    let relay = match &config.rugplay_base_url {
        Some(url) => RugplayClient::with_base_url(url.clone(), config.relay_timeout),
        None => RugplayClient::new(config.relay_timeout),
    };
    let relay: Arc<dyn TransferRelay> = match relay {
        Ok(r) => Arc::new(r),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&store),
        relay,
        config.default_credential.clone(),
    ));

    // Admin dashboard runs alongside the gateway connection
    let admin = Arc::new(AdminSurface::new(Arc::clone(&store), config.admin_token.clone()));
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind admin port {}: {}", config.port, e);
            return;
        }
    };
    info!("Admin dashboard listening on port {}", config.port);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, admin::router(admin)).await {
            error!("Admin server error: {}", e);
        }
    });

    let intents = GatewayIntents::GUILDS;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler { dispatcher })
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    warn!("Gateway connection closed, shutting down");
    store.close().await;
}
