use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::services::auth::validator::{TokenValidator, ValidationError};

/// Registered claims checked on top of what `jsonwebtoken::Validation` enforces.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredClaims {
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub sub: String,
    pub exp: u64,
}

/// Signature-checking validator that can be plugged into the gate.
///
/// - EdDSA (Ed25519 public key PEM) for production
/// - HS256 shared secret for local setups and tests
/// - Key material is not printable via Debug
#[derive(Clone)]
pub struct JwtSignatureValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtSignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtSignatureValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtSignatureValidator {
    pub fn from_ed_pem(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?;

        Ok(Self::with_key(
            decoding_key,
            Algorithm::EdDSA,
            issuer,
            audience,
            leeway_seconds,
        ))
    }

    pub fn from_secret(secret: &[u8], issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        Self::with_key(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            issuer,
            audience,
            leeway_seconds,
        )
    }

    fn with_key(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify signature + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature
    /// - `exp`
    /// - `iss` and `aud` (because we set them)
    ///
    /// This method additionally requires `iss` and `sub` to be non-empty.
    pub fn verify(&self, token: &str) -> Result<RegisteredClaims, ValidationError> {
        let data =
            jsonwebtoken::decode::<RegisteredClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.iss.trim().is_empty() {
            return Err(ValidationError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(ValidationError::EmptyClaim("sub"));
        }

        Ok(claims)
    }
}

#[async_trait]
impl TokenValidator for JwtSignatureValidator {
    async fn validate(
        &self,
        _scope: &CancellationToken,
        token: &str,
    ) -> Result<(), ValidationError> {
        // CPU-only check; nothing to cancel.
        self.verify(token).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret";

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn sign(claims: serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn validator() -> JwtSignatureValidator {
        JwtSignatureValidator::from_secret(SECRET, "https://issuer.example", "gate", 0)
    }

    #[test]
    fn accepts_well_formed_token() {
        let token = sign(
            json!({
                "iss": "https://issuer.example",
                "aud": "gate",
                "sub": "u1",
                "exp": now() + 3600,
            }),
            SECRET,
        );

        let claims = validator().verify(&token).unwrap();
        assert_eq!(claims.sub, "u1");
    }

    #[test]
    fn rejects_foreign_signature() {
        let token = sign(
            json!({
                "iss": "https://issuer.example",
                "aud": "gate",
                "sub": "u1",
                "exp": now() + 3600,
            }),
            b"some-other-secret-some-other-secret",
        );

        assert!(matches!(
            validator().verify(&token),
            Err(ValidationError::Jwt(_))
        ));
    }

    #[test]
    fn rejects_wrong_issuer_and_expired_token() {
        let wrong_issuer = sign(
            json!({
                "iss": "https://elsewhere.example",
                "aud": "gate",
                "sub": "u1",
                "exp": now() + 3600,
            }),
            SECRET,
        );
        assert!(validator().verify(&wrong_issuer).is_err());

        let expired = sign(
            json!({
                "iss": "https://issuer.example",
                "aud": "gate",
                "sub": "u1",
                "exp": now() - 3600,
            }),
            SECRET,
        );
        assert!(validator().verify(&expired).is_err());
    }

    #[test]
    fn rejects_empty_subject() {
        let token = sign(
            json!({
                "iss": "https://issuer.example",
                "aud": "gate",
                "sub": "  ",
                "exp": now() + 3600,
            }),
            SECRET,
        );

        assert!(matches!(
            validator().verify(&token),
            Err(ValidationError::EmptyClaim("sub"))
        ));
    }

    #[test]
    fn rejects_invalid_pem() {
        let err = JwtSignatureValidator::from_ed_pem("not a pem", "iss", "aud", 60).unwrap_err();
        assert!(err.contains("invalid ed25519 public key pem"));
    }

    #[tokio::test]
    async fn validate_ignores_scope_for_local_checks() {
        let token = sign(
            json!({
                "iss": "https://issuer.example",
                "aud": "gate",
                "sub": "u1",
                "exp": now() + 3600,
            }),
            SECRET,
        );

        let scope = CancellationToken::new();
        assert!(validator().validate(&scope, &token).await.is_ok());
        assert!(validator().validate(&scope, "a.b.c").await.is_err());
    }
}
