/*
 * Responsibility
 * - GET /api/v1/claims
 * - gate が投影した claim をそのまま JSON object で返す (疎通・設定確認用)
 */
use axum::{Json, response::IntoResponse};

use crate::api::v1::extractors::ClaimsExtractor;

pub async fn claims(ClaimsExtractor(claims): ClaimsExtractor) -> impl IntoResponse {
    Json(claims)
}
