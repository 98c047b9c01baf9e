use axum::{
    http::Method,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod plans;
pub mod requests;
pub mod reviews;
pub mod state;
pub mod users;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/me", get(users::my_profile).patch(users::update_profile))
        .route("/v1/plans", get(plans::list_plans).post(plans::create_plan))
        .route("/v1/plans/match", get(plans::match_plans))
        .route("/v1/plans/my-plans", get(plans::my_plans))
        .route("/v1/plans/my-requests", get(requests::my_sent_requests))
        .route(
            "/v1/plans/{id}",
            get(plans::get_plan)
                .patch(plans::update_plan)
                .delete(plans::delete_plan),
        )
        .route("/v1/plans/{id}/start", patch(plans::start_plan))
        .route("/v1/plans/{id}/complete", patch(plans::complete_plan))
        .route("/v1/plans/{id}/request", post(requests::send_request))
        .route("/v1/plans/{id}/requests", get(requests::list_plan_requests))
        .route("/v1/requests/{id}", patch(requests::update_request))
        .route("/v1/reviews", post(reviews::create_review))
        .route("/v1/reviews/my-received", get(reviews::my_received_reviews))
        .nest("/v1/admin", admin::routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
