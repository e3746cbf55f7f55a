// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, daily::DailyDispatcher, db::QuestionRepository, scheduler::Scheduler};

pub type SharedQuestions = Arc<dyn QuestionRepository>;

#[derive(Clone)]
pub struct AppState {
    pub questions: SharedQuestions,
    pub dispatcher: Arc<DailyDispatcher>,
    pub scheduler: Arc<Scheduler>,
    pub config: Config,
}

impl FromRef<AppState> for SharedQuestions {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for Arc<DailyDispatcher> {
    fn from_ref(state: &AppState) -> Self {
        state.dispatcher.clone()
    }
}

impl FromRef<AppState> for Arc<Scheduler> {
    fn from_ref(state: &AppState) -> Self {
        state.scheduler.clone()
    }
}
