// src/docs.rs

use utoipa::OpenApi;

use crate::{
    daily::DailyMessage,
    handlers::{question, root, scheduler, send},
    models::question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
    scheduler::JobStatus,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "high-noon", description = "Daily quiz broadcaster"),
    paths(
        root::hello_world,
        root::teapot,
        question::create_question,
        question::list_questions,
        question::list_subjects,
        question::get_question,
        question::update_question,
        question::delete_question,
        send::send_question,
        send::send_answer,
        send::send_countdown,
        scheduler::list_jobs,
        scheduler::update_job,
    ),
    components(schemas(
        Question,
        CreateQuestionRequest,
        UpdateQuestionRequest,
        DailyMessage,
        JobStatus,
        scheduler::UpdateJobRequest,
    )),
    tags(
        (name = "misc", description = "Greeting and joke"),
        (name = "questions", description = "Question database, local only"),
        (name = "send", description = "Manual broadcasts, local only"),
        (name = "scheduler", description = "Daily broadcast jobs, local only")
    )
)]
pub struct ApiDoc;
