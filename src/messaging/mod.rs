// src/messaging/mod.rs

pub mod line;

use async_trait::async_trait;

use crate::error::AppError;

pub use line::LineBroadcaster;

/// Delivers a text message to every subscriber of the bot.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, text: &str) -> Result<(), AppError>;
}

/// Broadcaster used when no messaging channel is configured.
/// Messages are written to the log instead of being delivered.
#[derive(Debug, Default, Clone)]
pub struct LogBroadcaster;

#[async_trait]
impl Broadcaster for LogBroadcaster {
    async fn broadcast(&self, text: &str) -> Result<(), AppError> {
        tracing::info!(chars = text.chars().count(), "Broadcast (not delivered): {}", text);
        Ok(())
    }
}
