use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use crate::models::session::SessionUser;
use crate::services::profiles::ProfileService;
use crate::AppState;

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing X-User-Id header"))?;

        let user_id: Uuid = raw
            .parse()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid X-User-Id header"))?;

        // The header is client-held state; verify the profile still exists
        // before letting the request through.
        let profile = ProfileService::find(&state.db, user_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"))?
            .ok_or((StatusCode::UNAUTHORIZED, "Unknown profile"))?;

        Ok(SessionUser {
            user_id: profile.id,
            name: profile.name,
        })
    }
}
