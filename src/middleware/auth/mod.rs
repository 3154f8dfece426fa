//! Bearer token authentication for protected routes.
pub mod error;
pub mod gate;

pub use error::{DecodeError, GateError};
pub use gate::{CredentialGate, GateConfig, Payload, apply, decode_payload, extract_bearer};
