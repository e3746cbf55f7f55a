// src/routes.rs

use axum::{
    Router, middleware,
    routing::{any, get, post, put},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{question, root, scheduler, send},
    state::AppState,
    utils::{network::local_only_middleware, rate_limit::rate_limited},
};

/// Assembles the main application router.
///
/// * Public routes: greeting, teapot, API docs.
/// * Local-only, rate-limited routes: question database, manual broadcasts,
///   scheduler control. The local check runs first so foreign callers never
///   consume quota.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`; the
/// guarded routes need the peer address.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root::hello_world))
        .route("/teapot", get(root::teapot));

    let rate = state.config.rate_limit_per_minute;

    let question_routes = Router::new()
        .route("/", rate_limited(get(question::list_questions), rate))
        .route("/create", rate_limited(post(question::create_question), rate))
        .route("/subjects", rate_limited(get(question::list_subjects), rate))
        .route(
            "/{id}",
            rate_limited(
                get(question::get_question)
                    .put(question::update_question)
                    .delete(question::delete_question),
                rate,
            ),
        );

    let send_routes = Router::new()
        .route("/question", rate_limited(any(send::send_question), rate))
        .route("/answer", rate_limited(any(send::send_answer), rate))
        .route("/countdown", rate_limited(any(send::send_countdown), rate));

    let scheduler_routes = Router::new()
        .route("/", rate_limited(get(scheduler::list_jobs), rate))
        .route("/jobs/{id}", rate_limited(put(scheduler::update_job), rate));

    // Limiters sit on each route; the locality check wraps them all.
    let local_routes = Router::new()
        .nest("/db/question", question_routes)
        .nest("/send", send_routes)
        .nest("/scheduler", scheduler_routes)
        .route_layer(middleware::from_fn(local_only_middleware));

    Router::new()
        .merge(public_routes)
        .merge(local_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
