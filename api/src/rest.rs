use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, health, metrics as metrics_handler, wishlist},
    metrics::track_requests,
    AppState,
};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/wishlists", post(wishlist::create).get(wishlist::list))
        .route(
            "/wishlists/:id",
            get(wishlist::get)
                .put(wishlist::update)
                .delete(wishlist::delete),
        )
        .route("/wishlists/:id/items", post(wishlist::add_item))
        .route(
            "/wishlists/:id/items/:item_id",
            get(wishlist::get_item)
                .put(wishlist::update_item)
                .delete(wishlist::delete_item),
        );

    Router::new()
        .route("/health", get(health::check))
        .route("/metrics", get(metrics_handler::export))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
