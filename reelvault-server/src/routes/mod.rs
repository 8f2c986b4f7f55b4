use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{handlers as auth_handlers, middleware as auth_mw},
    infra::AppState,
    movies::handlers as movie_handlers,
    stream,
    users::handlers as user_handlers,
};

/// Build the full `/api` router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes(state.clone()))
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .merge(superadmin_routes(state.clone()));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn public_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/logout", post(auth_handlers::logout))
        .route("/movies/public", get(movie_handlers::list_public_movies))
        // Catalog reads work anonymously but reveal more to admins
        .route("/movies", get(movie_handlers::list_movies))
        .route("/movies/{id}", get(movie_handlers::get_movie))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth_mw::optional_auth_middleware,
        ))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth_handlers::me))
        .route("/movies/{id}/stream", get(stream::stream_movie))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth_mw::auth_middleware,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(user_handlers::list_users))
        .route("/users", post(user_handlers::create_user))
        .route("/users/{id}", get(user_handlers::get_user))
        .route("/movies/sync", post(movie_handlers::sync_catalog))
        .route_layer(middleware::from_fn(auth_mw::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth_mw::auth_middleware,
        ))
}

fn superadmin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/{id}", put(user_handlers::update_user))
        .route("/users/{id}", delete(user_handlers::delete_user))
        .route("/movies", post(movie_handlers::create_movie))
        .route("/movies/{id}", put(movie_handlers::update_movie))
        .route("/movies/{id}", delete(movie_handlers::delete_movie))
        .route_layer(middleware::from_fn(auth_mw::require_superadmin))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth_mw::auth_middleware,
        ))
}
