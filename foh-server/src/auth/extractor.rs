//! JWT Extractor
//!
//! Handlers take [`CurrentUser`] as an argument; the user placed in the
//! request extensions by `require_auth` is reused when present.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::middleware::{authenticate_header, load_staff_user};
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let claimed = authenticate_header(state.get_jwt_service(), header, &parts.uri)?;
        let user = load_staff_user(state, claimed, &parts.uri).await?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
