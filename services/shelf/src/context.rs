//! Per-request context
//!
//! Identity and the pending flash notice are resolved once, when the
//! handler's arguments are extracted, and travel with the request from there.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

use crate::{AppState, models::UserId, session::Flash};

pub struct RequestContext {
    /// Cookies to send back; already holds the flash removal when a flash was read
    pub jar: CookieJar,
    pub user_id: Option<UserId>,
    pub flash: Option<Flash>,
}

impl RequestContext {
    pub fn signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let user_id = parts
            .extensions
            .get::<UserId>()
            .copied()
            .or_else(|| state.sessions.current_user_id(&jar));
        let (jar, flash) = state.sessions.take_flash(jar);

        Ok(Self {
            jar,
            user_id,
            flash,
        })
    }
}
