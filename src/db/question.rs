// src/db/question.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    db::{QuestionFilter, QuestionRepository},
    error::AppError,
    models::question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
};

const QUESTION_COLUMNS: &str =
    "id, subject, description, opts, ans, explanation, details, created_at";

/// Postgres-backed question store.
#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn create(&self, question: CreateQuestionRequest) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO questions
            (subject, description, opts, ans, explanation, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(question.subject)
        .bind(question.description)
        .bind(question.opts)
        .bind(question.ans)
        .bind(question.explanation)
        .bind(question.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Question>, AppError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn update(&self, id: i64, changes: UpdateQuestionRequest) -> Result<bool, AppError> {
        if changes.is_empty() {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM questions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            return Ok(exists.is_some());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE questions SET ");
        let mut separated = builder.separated(", ");

        if let Some(subject) = changes.subject {
            separated.push("subject = ");
            separated.push_bind_unseparated(subject);
        }

        if let Some(description) = changes.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }

        if let Some(opts) = changes.opts {
            separated.push("opts = ");
            separated.push_bind_unseparated(opts);
        }

        if let Some(ans) = changes.ans {
            separated.push("ans = ");
            separated.push_bind_unseparated(ans);
        }

        if let Some(explanation) = changes.explanation {
            separated.push("explanation = ");
            separated.push_bind_unseparated(explanation);
        }

        if let Some(details) = changes.details {
            separated.push("details = ");
            separated.push_bind_unseparated(details);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to update question: {:?}", e);
            AppError::from(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete question: {:?}", e);
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: QuestionFilter) -> Result<Vec<Question>, AppError> {
        let search_pattern = filter.q.map(|term| format!("%{}%", term));

        let questions = sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {}
            FROM questions
            WHERE ($1::TEXT IS NULL OR subject = $1)
              AND ($2::TEXT IS NULL OR subject ILIKE $2 OR description ILIKE $2)
            ORDER BY id
            "#,
            QUESTION_COLUMNS
        ))
        .bind(filter.subject)
        .bind(search_pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn subjects(&self) -> Result<Vec<String>, AppError> {
        let subjects: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT subject FROM questions ORDER BY subject")
                .fetch_all(&self.pool)
                .await?;

        Ok(subjects)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn random_excluding(&self, exclude: &[i64]) -> Result<Option<Question>, AppError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {}
            FROM questions
            WHERE NOT (id = ANY($1))
            ORDER BY RANDOM()
            LIMIT 1
            "#,
            QUESTION_COLUMNS
        ))
        .bind(exclude.to_vec())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to pick a random question: {:?}", e);
            AppError::from(e)
        })?;

        Ok(question)
    }
}
