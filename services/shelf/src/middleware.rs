//! Session guard for pages that need a logged-in user

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::info;

use crate::AppState;

/// Redirect anonymous requests to the login page
///
/// On success the resolved `UserId` is added to the request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match state.sessions.current_user_id(&jar) {
        Some(user_id) => {
            req.extensions_mut().insert(user_id);
            next.run(req).await
        }
        None => {
            info!("Anonymous request to {}, redirecting to login", req.uri().path());
            Redirect::to("/login").into_response()
        }
    }
}
