use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use super::RequestClaims;

/// Handler で、gate が投影した claim を受け取るための extractor
/// middleware が RequestClaims を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（gate が掛かっていないルート）
pub struct ClaimsExtractor(pub RequestClaims);

impl<S> FromRequestParts<S> for ClaimsExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestClaims>()
            .cloned()
            .map(ClaimsExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
