// src/daily.rs

use std::{collections::HashSet, fmt, sync::Arc};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::{db::QuestionRepository, error::AppError, messaging::Broadcaster, models::question::Question};

pub const NO_QUESTION_TEXT: &str = "No question is available today.";
pub const NO_ANSWER_TEXT: &str = "There is no question to answer today.";

/// The kinds of daily broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DailyMessage {
    Question,
    Answer,
    Countdown,
}

impl fmt::Display for DailyMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DailyMessage::Question => "question",
            DailyMessage::Answer => "answer",
            DailyMessage::Countdown => "countdown",
        };
        f.write_str(name)
    }
}

/// Counts down the days to a fixed date.
#[derive(Debug, Clone)]
pub struct Countdown {
    pub target: NaiveDate,
    pub label: String,
}

impl Countdown {
    pub fn message(&self, today: NaiveDate) -> String {
        let days = (self.target - today).num_days();
        match days {
            d if d > 1 => format!("{} days left until {}.", d, self.label),
            1 => format!("1 day left until {}.", self.label),
            0 => format!("{} is today!", capitalize(&self.label)),
            _ => format!("{} has passed.", capitalize(&self.label)),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Default)]
struct DailyState {
    today: Option<Question>,
    served: HashSet<i64>,
}

/// Picks the question of the day and broadcasts the daily messages.
///
/// All dispatches are serialized, so an answer always refers to the
/// question broadcast before it.
pub struct DailyDispatcher {
    repo: Arc<dyn QuestionRepository>,
    broadcaster: Arc<dyn Broadcaster>,
    countdown: Option<Countdown>,
    state: Mutex<DailyState>,
}

impl DailyDispatcher {
    pub fn new(
        repo: Arc<dyn QuestionRepository>,
        broadcaster: Arc<dyn Broadcaster>,
        countdown: Option<Countdown>,
    ) -> Self {
        Self {
            repo,
            broadcaster,
            countdown,
            state: Mutex::new(DailyState::default()),
        }
    }

    pub async fn dispatch(&self, message: DailyMessage) -> Result<(), AppError> {
        match message {
            DailyMessage::Question => self.send_question().await,
            DailyMessage::Answer => self.send_answer().await,
            DailyMessage::Countdown => self.send_countdown().await,
        }
    }

    /// Picks a question not served since the last reset and broadcasts it.
    /// Once every question has been served the served set starts over.
    /// The pick only becomes today's question once the broadcast succeeds.
    pub async fn send_question(&self) -> Result<(), AppError> {
        let mut state = self.state.lock().await;

        let total = self.repo.count().await?;
        let exhausted = state.served.len() as i64 >= total;
        let served: Vec<i64> = if exhausted {
            Vec::new()
        } else {
            state.served.iter().copied().collect()
        };
        let picked = self.repo.random_excluding(&served).await?;

        let text = match &picked {
            Some(question) => {
                tracing::info!(id = question.id, subject = %question.subject, "Picked today's question");
                question.question_text()
            }
            None => {
                tracing::warn!("No question available for today");
                NO_QUESTION_TEXT.to_string()
            }
        };

        self.broadcaster.broadcast(&text).await?;

        if exhausted {
            tracing::info!(total, "All questions served, starting over");
            state.served.clear();
        }
        if let Some(question) = &picked {
            state.served.insert(question.id);
        }
        state.today = picked;

        Ok(())
    }

    /// Broadcasts the answer to the last question sent.
    pub async fn send_answer(&self) -> Result<(), AppError> {
        let state = self.state.lock().await;

        let text = match &state.today {
            Some(question) => question.answer_text(),
            None => NO_ANSWER_TEXT.to_string(),
        };

        self.broadcaster.broadcast(&text).await
    }

    /// Broadcasts the countdown. Does nothing when no target date is set.
    pub async fn send_countdown(&self) -> Result<(), AppError> {
        let _state = self.state.lock().await;

        let Some(countdown) = &self.countdown else {
            tracing::warn!("Countdown requested but COUNTDOWN_DATE is not configured");
            return Ok(());
        };

        let text = countdown.message(Utc::now().date_naive());
        self.broadcaster.broadcast(&text).await
    }

    /// The question most recently broadcast, if any.
    pub async fn today(&self) -> Option<Question> {
        self.state.lock().await.today.clone()
    }
}
