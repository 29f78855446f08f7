use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod extract;
mod health;
mod middleware_auth;

pub use health::health;
pub use middleware_auth::{JwtKeys, JwtUser};

use crate::state::AppState;
use crate::{lists, tasks};

pub fn routes(state: AppState) -> Router {
    let list_router = Router::new()
        .route("/", post(lists::routes::create))
        .route("/user/{user_id}", get(lists::routes::find_all))
        .route(
            "/{id}",
            get(lists::routes::find_one)
                .put(lists::routes::update)
                .delete(lists::routes::remove),
        );

    let task_router = Router::new()
        .route("/", post(tasks::routes::create))
        .route("/priority-and-list", get(tasks::routes::by_priority_and_list))
        .route("/status/completed-status", get(tasks::routes::by_completion_status))
        .route("/list/{list_id}", get(tasks::routes::by_list))
        .route(
            "/{id}",
            put(tasks::routes::update)
                .get(tasks::routes::get)
                .delete(tasks::routes::delete),
        )
        .route("/{id}/is-completed", patch(tasks::routes::set_completed));

    let protected = Router::new()
        .nest("/lists", list_router)
        .nest("/tasks", task_router)
        .route_layer(middleware::from_fn_with_state(
            state.keys.clone(),
            middleware_auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
