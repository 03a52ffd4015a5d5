use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use uuid::Uuid;

use super::dtos::{ArticleResponse, ArticleSummaryResponse, BookmarkPayload, ScrapeQuery};
use crate::{
    app_state::AppState,
    auth::middleware::AuthenticatedUser,
    errors::ServiceError,
    pagination::PaginationParams,
    response::{DataResponse, ErrorResponse, PaginatedResponse, invalid_params},
};

#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    params(ScrapeQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Scraped preview text", body = DataResponse<String>),
        (status = 400, description = "Missing url or nothing scraped", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 504, description = "Remote page timed out", body = ErrorResponse)
    )
)]
pub async fn scrape_article(
    _auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ScrapeQuery>,
) -> Result<Json<DataResponse<String>>, ServiceError> {
    let text = state.bookmarks.scrape_preview(query.url.as_deref()).await?;
    Ok(Json(DataResponse::new(text)))
}

#[utoipa::path(
    post,
    path = "/api/articles/bookmarks",
    tag = "articles",
    request_body = BookmarkPayload,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Bookmark created", body = DataResponse<ArticleResponse>),
        (status = 400, description = "Invalid payload or title in use", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
pub async fn create_bookmark(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(payload): Json<BookmarkPayload>,
) -> Response {
    let payload = match payload.validate() {
        Ok(payload) => payload,
        Err(details) => return invalid_params(details),
    };

    match state.bookmarks.bookmark(auth_user.user_id, payload).await {
        Ok(article) => (
            StatusCode::CREATED,
            Json(DataResponse::new(ArticleResponse::from(article))),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/articles/bookmarks",
    tag = "articles",
    params(PaginationParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of the caller's bookmarks", body = PaginatedResponse<ArticleSummaryResponse>),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
pub async fn list_bookmarks(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Response {
    let pagination = match params.validate() {
        Ok(p) => p,
        Err(details) => return invalid_params(details),
    };

    match state.bookmarks.list(auth_user.user_id, pagination).await {
        Ok((articles, meta)) => Json(PaginatedResponse {
            data: articles
                .into_iter()
                .map(ArticleSummaryResponse::from)
                .collect(),
            meta,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/articles/bookmarks/{id}",
    tag = "articles",
    params(("id" = Uuid, Path, description = "Article id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The article", body = DataResponse<ArticleResponse>),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such article", body = ErrorResponse)
    )
)]
pub async fn get_bookmark(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<ArticleResponse>>, ServiceError> {
    let article = state.bookmarks.get(auth_user.user_id, id).await?;
    Ok(Json(DataResponse::new(article.into())))
}

#[utoipa::path(
    put,
    path = "/api/articles/bookmarks/{id}",
    tag = "articles",
    params(("id" = Uuid, Path, description = "Article id")),
    request_body = BookmarkPayload,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated article", body = DataResponse<ArticleResponse>),
        (status = 400, description = "Invalid payload or title in use", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such article", body = ErrorResponse)
    )
)]
pub async fn update_bookmark(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookmarkPayload>,
) -> Response {
    let payload = match payload.validate() {
        Ok(payload) => payload,
        Err(details) => return invalid_params(details),
    };

    match state.bookmarks.update(auth_user.user_id, id, payload).await {
        Ok(article) => Json(DataResponse::new(ArticleResponse::from(article))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/articles/bookmarks/{id}",
    tag = "articles",
    params(("id" = Uuid, Path, description = "Article id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deleted; data is null"),
        (status = 400, description = "Nothing deleted", body = ErrorResponse)
    )
)]
pub async fn delete_bookmark(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<Value>>, ServiceError> {
    state.bookmarks.delete(auth_user.user_id, id).await?;
    Ok(Json(DataResponse::new(Value::Null)))
}
