use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use ai_inventory::news::{start_news_updater, Aggregator, ArticleRepository, HttpFeedReader};
use ai_inventory::newsletter::{start_weekly_newsletter, LogMailer, NewsletterService};
use ai_inventory::web::{shutdown_signal, AppState, WebServer};
use ai_inventory::{Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging; env overrides below may warn
    if let Err(e) = ai_inventory::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        ai_inventory::logging::init_console_only(&config.logging.level);
    }
    config.apply_env_overrides();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("AI Inventory backend starting");

    let db = if config.database.enabled {
        match Database::open(&config.database.path).await {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("Failed to open database: {}. Running with in-memory cache only.", e);
                None
            }
        }
    } else {
        info!("Database disabled, running with in-memory cache only");
        None
    };

    let reader = match HttpFeedReader::new(&config.news) {
        Ok(reader) => Arc::new(reader),
        Err(e) => {
            error!("Failed to create feed reader: {}", e);
            std::process::exit(1);
        }
    };

    let mut aggregator = Aggregator::from_config(&config.news, reader);
    if let Some(db) = &db {
        aggregator = aggregator.with_store(Arc::new(ArticleRepository::new(db.pool())));
    }
    let aggregator = Arc::new(aggregator);

    let mut app_state = AppState::from_aggregator(&aggregator);
    if let Some(db) = db.clone() {
        app_state = app_state.with_database(db);
    }

    let updater = start_news_updater(
        Arc::clone(&aggregator),
        Duration::from_secs(config.news.refresh_interval_secs),
    );

    let newsletter = match (&db, config.newsletter.enabled) {
        (Some(db), true) => {
            let service = NewsletterService::new(db.clone(), aggregator.cache(), Arc::new(LogMailer))
                .with_store(aggregator.store())
                .with_subject(config.newsletter.subject.clone());
            Some(start_weekly_newsletter(Arc::new(service)))
        }
        (None, true) => {
            warn!("Weekly newsletter needs the database, not scheduling it");
            None
        }
        _ => None,
    };

    let server = match WebServer::new(&config.server, app_state) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(shutdown_signal()).await {
        error!("Web server error: {}", e);
    }

    updater.shutdown().await;
    if let Some(newsletter) = newsletter {
        newsletter.shutdown().await;
    }
    if let Some(db) = db {
        db.close().await;
    }
    info!("AI Inventory backend stopped");
}
