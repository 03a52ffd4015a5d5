use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    auth::{
        dtos::{CallbackQuery, callback_err},
        oauth::GOOGLE_PROVIDER,
    },
    entities::{AuthProvider, NewUser, User},
    errors::ServiceError,
};

#[utoipa::path(
    get,
    path = "/api/auth/signin/google",
    tag = "auth",
    responses((status = 307, description = "Redirect to the Google consent screen"))
)]
pub async fn google_sign_in(State(state): State<AppState>) -> Response {
    let oauth_state = state.oauth_states.issue();
    match state.oauth.sign_in_url(&oauth_state) {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(e) => {
            error!(error = %e, "failed to build google sign-in url");
            ServiceError::server_error().into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/signin/google/callback",
    tag = "auth",
    params(CallbackQuery),
    responses((
        status = 307,
        description = "Redirect to the frontend with `access_token` or `err`"
    ))
)]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let frontend = state.config.frontend_url().to_string();
    let fail = |code: &str| Redirect::temporary(&format!("{frontend}/auth?err={code}"));

    let Some((code, oauth_state)) = query.params() else {
        warn!("oauth callback missing code or state");
        return fail(callback_err::INVALID_CALLBACK_PARAM);
    };
    if !state.oauth_states.consume(oauth_state) {
        warn!("oauth callback with unknown or expired state");
        return fail(callback_err::INVALID_CALLBACK_PARAM);
    }

    let profile = match state.oauth.exchange_code(code).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "failed to exchange oauth code");
            return fail(callback_err::EXCHANGE_CODE_FAILED);
        }
    };

    let user = match User::new(NewUser {
        email: profile.email,
        first_name: profile.first_name,
        last_name: profile.last_name,
    }) {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "identity provider returned unusable profile");
            return fail(callback_err::EXCHANGE_CODE_FAILED);
        }
    };

    let user = match state.user_repo.save_or_update(&user).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "failed to store user");
            return fail(callback_err::SERVER_ERR);
        }
    };

    let link = AuthProvider::new(GOOGLE_PROVIDER, &profile.id, user.id);
    if let Err(e) = state.auth_provider_repo.save_if_absent(&link).await {
        error!(error = %e, user_id = %user.id, "failed to link auth provider");
        return fail(callback_err::SERVER_ERR);
    }

    match state.jwt.generate_token(user.id) {
        Ok(token) => {
            info!(user_id = %user.id, "user signed in");
            Redirect::temporary(&format!("{frontend}/auth?access_token={token}"))
        }
        Err(e) => {
            error!(error = %e, "failed to issue token");
            fail(callback_err::SERVER_ERR)
        }
    }
}
