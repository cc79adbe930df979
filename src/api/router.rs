//! Clinic API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`; a permissive CORS layer is mounted
//! because the SPA consumes the API cross-origin during development.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::ApiContext;
use crate::db::Database;

/// Build the clinic API router.
///
/// Handlers use `State<ApiContext>`; `.with_state()` converts the typed
/// router into a `Router<()>` ready to serve.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn clinic_api_router(db: Database) -> Router {
    let ctx = ApiContext::new(db);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::get)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/:id",
            put(endpoints::appointments::update).delete(endpoints::appointments::remove),
        )
        .route(
            "/treatments",
            get(endpoints::treatments::list).post(endpoints::treatments::create),
        )
        .route(
            "/treatments/:id",
            put(endpoints::treatments::update).delete(endpoints::treatments::remove),
        )
        .route(
            "/payments",
            get(endpoints::payments::list).post(endpoints::payments::create),
        )
        .route(
            "/payments/:id",
            put(endpoints::payments::update).delete(endpoints::payments::remove),
        )
        .route("/auth/login", post(endpoints::auth::login))
        .route("/auth/password", put(endpoints::auth::change_password))
        .route("/auth/user", post(endpoints::auth::upsert_user));

    Router::new()
        .nest("/api", api)
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
