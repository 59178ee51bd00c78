/*
 * Responsibility
 * - 起動時に一度だけ環境変数を読む (JWT_AUDIENCE, JWT_ISSUER, ALLOWED_ORIGIN など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 下流には明示的な struct を渡す (env を直接読まない)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use jsonwebtoken::Algorithm;
use regex::Regex;

use crate::services::authorizer::{AuthConfig, EnvironmentError};
use crate::services::jwks::{JwksConfig, jwks_uri};

pub const DEFAULT_IDENTITY_HEADER: &str = "x-tenant-auth";
pub const DEFAULT_TOKEN_PATTERN: &str =
    r"^eyJ[A-Za-z0-9_-]+\.eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_.+/-]*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
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

/// How the gateway front door finds and pre-screens the token.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub identity_header: HeaderName,
    pub token_pattern: Regex,
    // Used in the policy when the invocation carries no methodArn.
    pub policy_resource: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth: AuthConfig,
    pub jwks: JwksConfig,
    pub jwks_uri: String,

    pub gateway: GatewayConfig,
    // None => `*`
    pub allowed_origin: Option<String>,

    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, EnvironmentError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env in production, a map in tests).
    pub fn from_vars<F>(var: F) -> Result<Self, EnvironmentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port: u16 = parse_or(get("PORT"), 3000, "PORT")?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| EnvironmentError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let audience = get("JWT_AUDIENCE").ok_or(EnvironmentError::Missing("JWT_AUDIENCE"))?;
        let issuer = get("JWT_ISSUER").ok_or(EnvironmentError::Missing("JWT_ISSUER"))?;

        let algorithm = match get("JWT_ALGORITHM") {
            Some(raw) => {
                Algorithm::from_str(&raw).map_err(|_| EnvironmentError::Invalid("JWT_ALGORITHM"))?
            }
            None => Algorithm::RS256,
        };

        let auth = AuthConfig {
            audience,
            issuer,
            algorithm,
            leeway_seconds: parse_or(get("JWT_LEEWAY_SECONDS"), 60, "JWT_LEEWAY_SECONDS")?,
        };
        auth.validate()?;

        let defaults = JwksConfig::default();
        let jwks = JwksConfig {
            lookup_timeout: Duration::from_millis(parse_or(
                get("JWKS_TIMEOUT_MS"),
                defaults.lookup_timeout.as_millis() as u64,
                "JWKS_TIMEOUT_MS",
            )?),
            requests_per_minute: parse_or(
                get("JWKS_REQUESTS_PER_MINUTE"),
                defaults.requests_per_minute,
                "JWKS_REQUESTS_PER_MINUTE",
            )?,
            cache_ttl: Duration::from_secs(parse_or(
                get("JWKS_CACHE_TTL_SECS"),
                defaults.cache_ttl.as_secs(),
                "JWKS_CACHE_TTL_SECS",
            )?),
            retry_backoff: defaults.retry_backoff,
        };

        let jwks_uri = match get("JWKS_URI") {
            Some(uri) => {
                url::Url::parse(&uri).map_err(|_| EnvironmentError::Invalid("JWKS_URI"))?;
                uri
            }
            None => jwks_uri(&auth.issuer),
        };

        let identity_header = match get("IDENTITY_HEADER") {
            Some(name) => HeaderName::from_str(&name.to_ascii_lowercase())
                .map_err(|_| EnvironmentError::Invalid("IDENTITY_HEADER"))?,
            None => HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
        };

        let token_pattern = Regex::new(
            get("TOKEN_VALIDATION_REGEX")
                .as_deref()
                .unwrap_or(DEFAULT_TOKEN_PATTERN),
        )
        .map_err(|_| EnvironmentError::Invalid("TOKEN_VALIDATION_REGEX"))?;

        let gateway = GatewayConfig {
            identity_header,
            token_pattern,
            policy_resource: get("POLICY_RESOURCE").unwrap_or_else(|| "*".to_string()),
        };

        let allowed_origin = get("ALLOWED_ORIGIN");
        if let Some(origin) = &allowed_origin {
            axum::http::HeaderValue::from_str(origin)
                .map_err(|_| EnvironmentError::Invalid("ALLOWED_ORIGIN"))?;
        }

        let request_timeout = Duration::from_secs(parse_or(
            get("REQUEST_TIMEOUT_SECS"),
            30,
            "REQUEST_TIMEOUT_SECS",
        )?);

        Ok(Self {
            addr,
            app_env,
            auth,
            jwks,
            jwks_uri,
            gateway,
            allowed_origin,
            request_timeout,
        })
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, EnvironmentError> {
    match raw {
        Some(v) => v.parse().map_err(|_| EnvironmentError::Invalid(key)),
        None => Ok(default),
    }
}
