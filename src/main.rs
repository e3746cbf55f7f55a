// src/main.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use dotenvy::dotenv;
use high_noon::{
    config::Config,
    daily::{Countdown, DailyDispatcher, DailyMessage},
    db::{PgQuestionRepository, QuestionRepository},
    messaging::{Broadcaster, LineBroadcaster, LogBroadcaster},
    routes,
    scheduler::Scheduler,
    state::AppState,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let pool = connect_with_retry(&config.database_url).await?;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied successfully.");

    let questions: Arc<dyn QuestionRepository> = Arc::new(PgQuestionRepository::new(pool));

    let broadcaster: Arc<dyn Broadcaster> = match &config.line_channel_access_token {
        Some(token) => {
            tracing::info!("Broadcasting through LINE at {}", config.line_api_base);
            Arc::new(LineBroadcaster::new(&config.line_api_base, token.clone())?)
        }
        None => {
            tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN not set, broadcasts will only be logged");
            Arc::new(LogBroadcaster)
        }
    };

    let countdown = config.countdown_date.map(|target| Countdown {
        target,
        label: config.countdown_label.clone(),
    });

    let dispatcher = Arc::new(DailyDispatcher::new(
        questions.clone(),
        broadcaster,
        countdown,
    ));

    // Register daily jobs
    let scheduler = Arc::new(Scheduler::new(dispatcher.clone()));
    scheduler
        .register(DailyMessage::Question, config.question_time, true)
        .await;
    scheduler
        .register(DailyMessage::Answer, config.answer_time, true)
        .await;
    if let Some(countdown_time) = config.countdown_time {
        scheduler
            .register(DailyMessage::Countdown, countdown_time, true)
            .await;
    }
    scheduler.start();

    let bind_addr = config.bind_addr;

    // Create AppState
    let state = AppState {
        questions,
        dispatcher,
        scheduler,
        config,
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("Listening on {}", bind_addr);

    // Start the server; guarded routes need the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Initialize Database Pool with Retry
async fn connect_with_retry(database_url: &str) -> anyhow::Result<PgPool> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    return Err(e).context("Failed to connect to database after 5 retries");
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
