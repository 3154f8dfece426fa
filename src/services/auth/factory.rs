/// Factory: build the gate's `TokenValidator` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, ValidatorConfig};
use crate::error::AppError;
use crate::services::auth::{JwtSignatureValidator, TokenValidator};

/// `None` means the gate runs in decode-only mode.
pub fn build_validator(config: &Config) -> Result<Option<Arc<dyn TokenValidator>>, AppError> {
    match &config.validator {
        ValidatorConfig::Disabled => {
            tracing::warn!(
                "no token validator configured; bearer tokens are decoded without verification"
            );
            Ok(None)
        }
        ValidatorConfig::Jwt {
            public_key_pem,
            issuer,
            audience,
            leeway_seconds,
        } => {
            let validator = JwtSignatureValidator::from_ed_pem(
                public_key_pem,
                issuer,
                audience,
                *leeway_seconds,
            )
            .map_err(AppError::InvalidKey)?;

            Ok(Some(Arc::new(validator)))
        }
    }
}
