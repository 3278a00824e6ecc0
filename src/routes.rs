// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, quiz, user},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quiz, user, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Fetching questions is public; submitting an attempt needs a session.
    // The layer only wraps the POST handler registered before it.
    let quiz_routes = Router::new().route(
        "/",
        post(quiz::submit_quiz)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .get(quiz::get_questions),
    );

    let user_routes = Router::new()
        .route("/user-results", get(quiz::get_user_results))
        .route("/user-answers", get(quiz::get_latest_answers))
        .route("/user", patch(user::update_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/stats", get(admin::get_stats))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/quizzes", get(admin::list_quizzes))
        .route(
            "/quizzes/{quiz_id}/questions",
            get(admin::list_quiz_questions).post(admin::create_question),
        )
        .route(
            "/questions/{id}",
            put(admin::update_question).delete(admin::delete_question),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Registered after the layers, so the login route stays open.
        .route("/login", post(admin::admin_login));

    Router::new()
        .nest("/api/auth", auth_routes)
        .route("/api/user-info/me", get(auth::me))
        .nest("/api/quiz", quiz_routes)
        .nest("/api", user_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
