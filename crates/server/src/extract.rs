use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::typed_header::TypedHeader;

use service::auth::domain::AuthUser;

use crate::errors::ApiError;
use crate::state::ServerState;

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
/// Routes that take this extractor reject unauthenticated requests with 401.
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::unauthorized("not authorized, no token"))?;
        let user = state.auth.current_user(bearer.token()).await?;
        Ok(CurrentUser(user))
    }
}
