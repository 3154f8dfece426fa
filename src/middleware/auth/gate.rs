//! Bearer token gate: extract → validate → decode → project claims → next.
//!
//! The gate does not verify signatures itself. Anything stronger than a
//! structural check on the token is the plugged-in `TokenValidator`'s job;
//! without one the gate runs in decode-only mode.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::Response,
};
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::api::v1::extractors::{ClaimSink, RequestClaims};
use crate::middleware::auth::error::{DecodeError, GateError};
use crate::services::auth::{TokenValidator, ValidationError};

/// URL-safe alphabet, no padding, lenient about unused bits in the last symbol.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Decoded middle segment of a bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Claim value, or `Value::Null` when the payload does not carry it.
    pub fn claim(&self, name: &str) -> Value {
        self.0.get(name).cloned().unwrap_or(Value::Null)
    }
}

/// Construction-time settings for `CredentialGate`.
#[derive(Clone, Default)]
pub struct GateConfig {
    /// Claim names projected into the request context, in this order.
    pub claims: Vec<String>,
    /// `None` runs the gate in decode-only mode.
    pub validator: Option<Arc<dyn TokenValidator>>,
}

impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateConfig")
            .field("claims", &self.claims)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Immutable after construction; cheap to clone and shared by all requests.
#[derive(Clone)]
pub struct CredentialGate {
    claims: Arc<[String]>,
    validator: Option<Arc<dyn TokenValidator>>,
}

impl std::fmt::Debug for CredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGate")
            .field("claims", &self.claims)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl CredentialGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            claims: Arc::from(config.claims),
            validator: config.validator,
        }
    }

    pub fn claims(&self) -> &[String] {
        &self.claims
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Runs extraction, validation, decode and projection against `headers`.
    ///
    /// Nothing is written to `sink` unless every earlier step succeeded.
    pub async fn authenticate<S>(
        &self,
        headers: &HeaderMap,
        scope: &CancellationToken,
        sink: &mut S,
    ) -> Result<(), GateError>
    where
        S: ClaimSink + Send,
    {
        let token = extract_bearer(headers)?;

        self.validate(scope, token).await?;

        let payload = decode_payload(token)?;

        for name in self.claims.iter() {
            sink.set(name, payload.claim(name));
        }

        Ok(())
    }

    /// Authenticates `req` and, on success, passes it to `next` with
    /// `RequestClaims` in its extensions. On failure `next` is not run.
    pub async fn handle(&self, mut req: Request, next: Next) -> Result<Response, GateError> {
        let mut claims = RequestClaims::new();
        let scope = CancellationToken::new();

        let outcome = {
            // Fires if this future is dropped mid-validation (timeout, disconnect).
            let _guard = scope.clone().drop_guard();
            self.authenticate(req.headers(), &scope, &mut claims).await
        };

        if let Err(err) = outcome {
            tracing::warn!(kind = err.kind(), error = ?err, "request authentication failed");
            return Err(err);
        }

        tracing::debug!(claims = claims.len(), "request authenticated");

        // middleware → extractor への受け渡し
        req.extensions_mut().insert(claims);

        Ok(next.run(req).await)
    }

    async fn validate(&self, scope: &CancellationToken, token: &str) -> Result<(), GateError> {
        let Some(validator) = self.validator.as_deref() else {
            return Ok(());
        };

        tokio::select! {
            biased;
            _ = scope.cancelled() => Err(GateError::Validation(ValidationError::Cancelled)),
            outcome = validator.validate(scope, token) => outcome.map_err(GateError::Validation),
        }
    }
}

/// Puts `gate` in front of every route of `router`.
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::apply(v1, state.gate.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<S>(router: Router<S>, gate: CredentialGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, gate_middleware))
}

async fn gate_middleware(
    State(gate): State<CredentialGate>,
    req: Request,
    next: Next,
) -> Result<Response, GateError> {
    gate.handle(req, next).await
}

/// Returns the raw credential of an `Authorization: Bearer <token>` header.
///
/// The header must split on whitespace into exactly two fields, the first
/// being `bearer` in any case. The token is returned as-is.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, GateError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .ok_or(GateError::Extraction)?;

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(GateError::Extraction),
    }
}

/// Decodes the JSON object carried in the second `.`-separated segment.
///
/// Requires at least three segments; only the second one is read.
pub fn decode_payload(token: &str) -> Result<Payload, DecodeError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature)) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(DecodeError::MalformedStructure);
    };

    let json = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(DecodeError::BadEncoding)?;

    let map = serde_json::from_slice::<Map<String, Value>>(&json).map_err(DecodeError::BadPayload)?;

    Ok(Payload(map))
}
