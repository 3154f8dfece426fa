/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, 投影する claim 名, validator の種類など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which `TokenValidator` the service plugs into the gate.
#[derive(Clone, PartialEq, Eq)]
pub enum ValidatorConfig {
    /// Decode-only mode: the gate runs without a validator.
    Disabled,
    /// Signature + registered-claim checks with an Ed25519 public key.
    Jwt {
        public_key_pem: String,
        issuer: String,
        audience: String,
        leeway_seconds: u64,
    },
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            ValidatorConfig::Disabled => f.write_str("Disabled"),
            ValidatorConfig::Jwt {
                issuer,
                audience,
                leeway_seconds,
                ..
            } => f
                .debug_struct("Jwt")
                .field("issuer", issuer)
                .field("audience", audience)
                .field("leeway_seconds", leeway_seconds)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Claim names copied from the token payload into the request context, in order.
    pub gate_claims: Vec<String>,
    pub validator: ValidatorConfig,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build a `Config` from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this; tests pass a map instead of
    /// mutating the process environment.
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let gate_claims = get("GATE_CLAIMS")
            .unwrap_or_else(|| "sub".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let validator = match get("TOKEN_VALIDATOR")
            .unwrap_or_else(|| "none".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "none" | "" => ValidatorConfig::Disabled,
            "jwt" => {
                let public_key_pem = get("ACCESS_JWT_PUBLIC_KEY_PEM")
                    .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
                    .replace("\\n", "\n");

                let issuer = get("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
                let audience =
                    get("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

                let leeway_seconds = get("ACCESS_TOKEN_LEEWAY_SECONDS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);

                ValidatorConfig::Jwt {
                    public_key_pem,
                    issuer,
                    audience,
                    leeway_seconds,
                }
            }
            _ => return Err(ConfigError::Invalid("TOKEN_VALIDATOR")),
        };

        let request_timeout = get("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let request_body_limit_bytes = get("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            gate_claims,
            validator,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}
