use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    articles::{self, dtos as article_dtos},
    auth, health,
    middleware::{RateLimit, rate_limit_middleware},
    pagination::Meta,
    response::ErrorResponse,
    users,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        articles::handlers::scrape_article,
        articles::handlers::create_bookmark,
        articles::handlers::list_bookmarks,
        articles::handlers::get_bookmark,
        articles::handlers::update_bookmark,
        articles::handlers::delete_bookmark,
        auth::handlers::google_sign_in,
        auth::handlers::google_callback,
        users::handlers::get_user_info,
    ),
    components(schemas(
        article_dtos::BookmarkPayload,
        article_dtos::ArticleResponse,
        article_dtos::ArticleSummaryResponse,
        users::handlers::UserResponse,
        health::HealthResponse,
        ErrorResponse,
        Meta,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "articles", description = "Scraping and bookmarks"),
        (name = "auth", description = "Google sign-in"),
        (name = "users", description = "Signed-in user"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn api_routes() -> Router<AppState> {
    use articles::handlers::*;

    Router::new()
        .route("/articles", get(scrape_article))
        .route("/articles/bookmarks", post(create_bookmark).get(list_bookmarks))
        .route(
            "/articles/bookmarks/{id}",
            get(get_bookmark).put(update_bookmark).delete(delete_bookmark),
        )
        .route("/auth/signin/google", get(auth::handlers::google_sign_in))
        .route(
            "/auth/signin/google/callback",
            get(auth::handlers::google_callback),
        )
        .route("/users", get(users::handlers::get_user_info))
}

/// The full HTTP surface with tracing, request ids and CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .nest("/api", api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Per-IP limiting. Only works when served with connect info.
pub fn with_rate_limit(router: Router, limit: RateLimit) -> Router {
    router.layer(middleware::from_fn_with_state(limit, rate_limit_middleware))
}
