// tests/common/mod.rs

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveTime;
use high_noon::{
    config::{Config, DEFAULT_LINE_API_BASE},
    daily::{Countdown, DailyDispatcher},
    db::{QuestionFilter, QuestionRepository},
    error::AppError,
    messaging::Broadcaster,
    models::question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
    routes,
    scheduler::Scheduler,
    state::AppState,
};
use tokio::sync::Mutex;

/// Question store kept in memory.
#[derive(Default)]
pub struct InMemoryQuestions {
    rows: Mutex<Vec<Question>>,
}

impl InMemoryQuestions {
    pub async fn all(&self) -> Vec<Question> {
        self.rows.lock().await.clone()
    }

    pub async fn seed(&self, count: usize) {
        for i in 0..count {
            self.create(sample_request(&format!("Question {}", i)))
                .await
                .unwrap();
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestions {
    async fn create(&self, q: CreateQuestionRequest) -> Result<i64, AppError> {
        let mut rows = self.rows.lock().await;
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        rows.push(Question {
            id,
            subject: q.subject,
            description: q.description,
            opts: q.opts,
            ans: q.ans,
            explanation: q.explanation,
            details: q.details,
            created_at: Some(chrono::Utc::now()),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Question>, AppError> {
        Ok(self.rows.lock().await.iter().find(|row| row.id == id).cloned())
    }

    async fn update(&self, id: i64, changes: UpdateQuestionRequest) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(false);
        };
        if let Some(subject) = changes.subject {
            row.subject = subject;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(opts) = changes.opts {
            row.opts = opts;
        }
        if let Some(ans) = changes.ans {
            row.ans = ans;
        }
        if let Some(explanation) = changes.explanation {
            row.explanation = explanation;
        }
        if let Some(details) = changes.details {
            row.details = details;
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }

    async fn list(&self, filter: QuestionFilter) -> Result<Vec<Question>, AppError> {
        let term = filter.q.map(|q| q.to_lowercase());
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| filter.subject.as_ref().is_none_or(|s| &row.subject == s))
            .filter(|row| {
                term.as_ref().is_none_or(|t| {
                    row.subject.to_lowercase().contains(t)
                        || row.description.to_lowercase().contains(t)
                })
            })
            .cloned()
            .collect())
    }

    async fn subjects(&self) -> Result<Vec<String>, AppError> {
        let mut subjects: Vec<String> = self
            .rows
            .lock()
            .await
            .iter()
            .map(|row| row.subject.clone())
            .collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.rows.lock().await.len() as i64)
    }

    async fn random_excluding(&self, exclude: &[i64]) -> Result<Option<Question>, AppError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| !exclude.contains(&row.id))
            .cloned())
    }
}

/// Broadcaster that remembers every message.
#[derive(Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<String>>,
}

impl RecordingBroadcaster {
    pub async fn sent(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn broadcast(&self, text: &str) -> Result<(), AppError> {
        self.sent.lock().await.push(text.to_string());
        Ok(())
    }
}

/// Broadcaster whose upstream always fails.
pub struct FailingBroadcaster;

#[async_trait]
impl Broadcaster for FailingBroadcaster {
    async fn broadcast(&self, _text: &str) -> Result<(), AppError> {
        Err(AppError::BadGateway("upstream unavailable".to_string()))
    }
}

/// Broadcaster that fails its first `failures` calls, then records.
pub struct FlakyBroadcaster {
    failures_left: Mutex<usize>,
    pub delivered: RecordingBroadcaster,
}

impl FlakyBroadcaster {
    pub fn new(failures: usize) -> Self {
        Self {
            failures_left: Mutex::new(failures),
            delivered: RecordingBroadcaster::default(),
        }
    }
}

#[async_trait]
impl Broadcaster for FlakyBroadcaster {
    async fn broadcast(&self, text: &str) -> Result<(), AppError> {
        let mut failures_left = self.failures_left.lock().await;
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(AppError::BadGateway("upstream hiccup".to_string()));
        }
        drop(failures_left);
        self.delivered.broadcast(text).await
    }
}

pub fn sample_request(description: &str) -> CreateQuestionRequest {
    CreateQuestionRequest {
        subject: "physics".to_string(),
        description: description.to_string(),
        opts: "A. Joule\nB. Newton".to_string(),
        ans: "B".to_string(),
        explanation: Some("Force is measured in newtons".to_string()),
        details: None,
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_dir: "logs".to_string(),
        line_channel_access_token: None,
        line_api_base: DEFAULT_LINE_API_BASE.parse().unwrap(),
        rate_limit_per_minute: 30,
        question_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        answer_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        countdown_time: None,
        countdown_date: None,
        countdown_label: "the exam".to_string(),
    }
}

pub struct TestApp {
    pub address: String,
    pub state: AppState,
    pub questions: Arc<InMemoryQuestions>,
    pub broadcaster: Arc<RecordingBroadcaster>,
}

pub fn build_state(
    config: Config,
    questions: Arc<InMemoryQuestions>,
    broadcaster: Arc<dyn Broadcaster>,
    countdown: Option<Countdown>,
) -> AppState {
    let dispatcher = Arc::new(DailyDispatcher::new(
        questions.clone(),
        broadcaster,
        countdown,
    ));
    let scheduler = Arc::new(Scheduler::new(dispatcher.clone()));

    AppState {
        questions,
        dispatcher,
        scheduler,
        config,
    }
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_state(state: AppState) -> String {
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    address
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let questions = Arc::new(InMemoryQuestions::default());
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let state = build_state(config, questions.clone(), broadcaster.clone(), None);
    let address = spawn_state(state.clone()).await;

    TestApp {
        address,
        state,
        questions,
        broadcaster,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}
