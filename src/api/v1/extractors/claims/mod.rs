/*!
 * Request claims extractor
 *
 * Responsibility:
 * - gate が token payload から取り出した claim を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - ClaimSink
 * - RequestClaims
 * - ClaimsExtractor
 */

mod core;
mod types;

pub use core::ClaimsExtractor;
pub use types::{ClaimSink, RequestClaims};
