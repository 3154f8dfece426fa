/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (CredentialGate の内部は Arc)
 */
use crate::middleware::auth::CredentialGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: CredentialGate,
}

impl AppState {
    pub fn new(gate: CredentialGate) -> Self {
        Self { gate }
    }
}
