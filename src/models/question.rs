// src/models/question.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: i64,

    /// Topic the question belongs to.
    pub subject: String,

    /// The text content of the question.
    pub description: String,

    /// Answer options, free-form (usually one option per line).
    pub opts: String,

    /// The correct answer key or content.
    pub ans: String,

    /// Explanation of the correct answer.
    pub explanation: Option<String>,

    /// Extra reference material.
    pub details: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    /// Text broadcast when the question is posed.
    pub fn question_text(&self) -> String {
        format!("{}\n\n{}", self.description, self.opts)
    }

    /// Text broadcast when the answer is revealed.
    pub fn answer_text(&self) -> String {
        match self.explanation.as_deref().map(str::trim) {
            Some(explanation) if !explanation.is_empty() => {
                format!("Ans: {}\n\n{}", self.ans, explanation)
            }
            _ => format!("Ans: {}", self.ans),
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(length(min = 1, max = 3000))]
    pub description: String,
    #[validate(length(min = 1, max = 1990))]
    pub opts: String,
    #[validate(length(min = 1, max = 500))]
    pub ans: String,
    #[validate(length(max = 4000))]
    pub explanation: Option<String>,
    #[validate(length(max = 4000))]
    pub details: Option<String>,
}

impl CreateQuestionRequest {
    /// Required fields, in the order they are checked.
    pub const REQUIRED_FIELDS: [&'static str; 4] = ["subject", "description", "opts", "ans"];

    /// Builds a request from a raw JSON body.
    ///
    /// The first required field that is absent, `null` or blank is reported
    /// as `AppError::MissingField`.
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        let Value::Object(fields) = body else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        for name in Self::REQUIRED_FIELDS {
            match fields.get(name) {
                None | Some(Value::Null) => return Err(AppError::MissingField(name)),
                Some(Value::String(value)) if value.trim().is_empty() => {
                    return Err(AppError::MissingField(name));
                }
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(AppError::BadRequest(format!(
                        "Field '{}' must be a string",
                        name
                    )));
                }
            }
        }

        let request: Self = serde_json::from_value(Value::Object(fields))?;
        request
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(request)
    }
}

/// DTO for updating a question. Absent fields are left unchanged.
///
/// `explanation` and `details` distinguish an absent key (`None`) from an
/// explicit `null` (`Some(None)`), which clears the column.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 3000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 1990))]
    pub opts: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub ans: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 4000))]
    pub explanation: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 4000))]
    pub details: Option<Option<String>>,
}

/// Keeps a present `null` as `Some(None)`; `#[serde(default)]` covers absence.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateQuestionRequest {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.description.is_none()
            && self.opts.is_none()
            && self.ans.is_none()
            && self.explanation.is_none()
            && self.details.is_none()
    }
}
