// src/handlers/question.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    db::QuestionFilter,
    error::AppError,
    models::question::{CreateQuestionRequest, UpdateQuestionRequest},
    state::SharedQuestions,
};

/// Creates a new question.
///
/// Required fields are checked in order `subject`, `description`, `opts`,
/// `ans`; the first one missing is returned as a plain-text 400 body.
/// Local only.
#[utoipa::path(
    post,
    path = "/db/question/create",
    tag = "questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Question stored"),
        (status = 400, description = "Name of the first missing field, or a validation error"),
        (status = 429, description = "Rate limited")
    )
)]
pub async fn create_question(
    State(questions): State<SharedQuestions>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: serde_json::Value = serde_json::from_slice(&body)?;
    let request = CreateQuestionRequest::from_json(payload)?;

    let subject = request.subject.clone();
    let id = questions.create(request).await?;
    tracing::info!(id, subject = %subject, "Question created");

    Ok(StatusCode::OK)
}

/// Lists questions, optionally filtered by exact `subject` and/or a
/// case-insensitive search term `q`.
/// Local only.
#[utoipa::path(
    get,
    path = "/db/question",
    tag = "questions",
    params(
        ("subject" = Option<String>, Query, description = "Exact subject"),
        ("q" = Option<String>, Query, description = "Search in subject and description")
    ),
    responses((status = 200, description = "Matching questions", body = [crate::models::question::Question]))
)]
pub async fn list_questions(
    State(questions): State<SharedQuestions>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let found = questions.list(filter).await?;
    Ok(Json(found))
}

/// Lists the distinct subjects.
/// Local only.
#[utoipa::path(
    get,
    path = "/db/question/subjects",
    tag = "questions",
    responses((status = 200, description = "Subjects", body = [String]))
)]
pub async fn list_subjects(
    State(questions): State<SharedQuestions>,
) -> Result<impl IntoResponse, AppError> {
    let subjects = questions.subjects().await?;
    Ok(Json(subjects))
}

/// Retrieves a single question by ID.
/// Local only.
#[utoipa::path(
    get,
    path = "/db/question/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "The question", body = crate::models::question::Question),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_question(
    State(questions): State<SharedQuestions>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = questions
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Updates a question by ID.
/// Local only.
#[utoipa::path(
    put,
    path = "/db/question/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_question(
    State(questions): State<SharedQuestions>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !questions.update(id, payload).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a question by ID.
/// Local only.
#[utoipa::path(
    delete,
    path = "/db/question/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn delete_question(
    State(questions): State<SharedQuestions>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !questions.delete(id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    tracing::info!(id, "Question deleted");
    Ok(StatusCode::NO_CONTENT)
}
