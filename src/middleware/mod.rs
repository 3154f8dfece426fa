/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: bearer token gate / http: 全ルート共通の transport 層
 */
pub mod auth;
pub mod http;
