mod errors;
mod events;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub use middleware::TOKEN_HEADER;
pub use state::{HttpState, generate_token};

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/summary", post(handlers::summary))
        .route("/state", post(handlers::state))
        .route("/weekly_total", post(handlers::weekly_total))
        .route("/turn_observed", post(handlers::turn_observed))
        .route(
            "/conversation_observed",
            post(handlers::conversation_observed),
        )
        .route("/estimate", post(handlers::estimate))
        .route("/session_reset", post(handlers::session_reset))
        .route("/reset", post(handlers::reset))
        .route("/events", get(events::stream))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_token,
        ));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
}
