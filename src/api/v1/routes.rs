/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - v1 配下は全て gate の内側 (Bearer 必須)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::claims::claims;
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/claims", get(claims));

    middleware::auth::apply(router, state.gate)
}
