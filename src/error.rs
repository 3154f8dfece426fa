/*
 * Responsibility
 * - 起動時 (設定読み込み・依存生成・bind/serve) のエラー定義
 * - リクエスト単位の認証エラーは middleware::auth::error 側 (GateError)
 */
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid validator key: {0}")]
    InvalidKey(String),

    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}
