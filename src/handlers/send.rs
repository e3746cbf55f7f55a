// src/handlers/send.rs

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};

use crate::{
    daily::{DailyDispatcher, DailyMessage},
    error::AppError,
};

async fn send(dispatcher: &DailyDispatcher, message: DailyMessage) -> Result<StatusCode, AppError> {
    tracing::info!(%message, "Manual broadcast requested");
    dispatcher.dispatch(message).await?;
    Ok(StatusCode::OK)
}

/// Picks a new question of the day and broadcasts it.
/// Any method is accepted. Local only.
#[utoipa::path(
    get,
    path = "/send/question",
    tag = "send",
    responses(
        (status = 200, description = "Question broadcast"),
        (status = 502, description = "Messaging API rejected the broadcast")
    )
)]
pub async fn send_question(
    State(dispatcher): State<Arc<DailyDispatcher>>,
) -> Result<StatusCode, AppError> {
    send(&dispatcher, DailyMessage::Question).await
}

/// Broadcasts the answer to the current question of the day.
/// Any method is accepted. Local only.
#[utoipa::path(
    get,
    path = "/send/answer",
    tag = "send",
    responses(
        (status = 200, description = "Answer broadcast"),
        (status = 502, description = "Messaging API rejected the broadcast")
    )
)]
pub async fn send_answer(
    State(dispatcher): State<Arc<DailyDispatcher>>,
) -> Result<StatusCode, AppError> {
    send(&dispatcher, DailyMessage::Answer).await
}

/// Broadcasts the countdown message.
/// Any method is accepted. Local only.
#[utoipa::path(
    get,
    path = "/send/countdown",
    tag = "send",
    responses(
        (status = 200, description = "Countdown broadcast, or nothing when no date is configured"),
        (status = 502, description = "Messaging API rejected the broadcast")
    )
)]
pub async fn send_countdown(
    State(dispatcher): State<Arc<DailyDispatcher>>,
) -> Result<StatusCode, AppError> {
    send(&dispatcher, DailyMessage::Countdown).await
}
