// src/db/mod.rs

pub mod question;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
};

pub use question::PgQuestionRepository;

/// Filters for listing questions. Both are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionFilter {
    /// Exact subject match.
    pub subject: Option<String>,
    /// Case-insensitive substring of subject or description.
    pub q: Option<String>,
}

/// Storage for question records.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Inserts a question and returns its id.
    async fn create(&self, question: CreateQuestionRequest) -> Result<i64, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Question>, AppError>;

    /// Applies the present fields. Returns `false` when the id is unknown.
    async fn update(&self, id: i64, changes: UpdateQuestionRequest) -> Result<bool, AppError>;

    /// Returns `false` when the id is unknown.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Questions matching the filter, ordered by id.
    async fn list(&self, filter: QuestionFilter) -> Result<Vec<Question>, AppError>;

    /// Distinct subjects, sorted.
    async fn subjects(&self) -> Result<Vec<String>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// A random question whose id is not in `exclude`.
    async fn random_excluding(&self, exclude: &[i64]) -> Result<Option<Question>, AppError>;
}
