/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, JWT 検証設定, GIS probe など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - lookup 関数から組み立てられるので、テストでは process env を触らない
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::token_resolver::ResolverMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
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

/// Key material for access-token signature checks.
#[derive(Clone)]
pub enum JwtKey {
    /// HMAC-SHA256 shared secret (the application's signing secret).
    Hs256Secret(String),
    /// Ed25519 public key, PEM encoded.
    EdDsaPublicPem(String),
}

impl fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            JwtKey::Hs256Secret(_) => f.write_str("Hs256Secret(..)"),
            JwtKey::EdDsaPublicPem(_) => f.write_str("EdDsaPublicPem(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub key: JwtKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,

    // Header-based extraction
    pub header_name: String,
    pub header_types: Vec<String>,

    pub resolver_mode: ResolverMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GisProbe {
    Enabled { gdalinfo_bin: String },
    Disabled,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Optional: principals are looked up in Postgres only when set.
    pub database_url: Option<String>,

    pub auth: AuthSettings,
    pub gis_probe: GisProbe,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = split_list(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let auth = auth_settings(&lookup)?;

        let gis_probe = match lookup("GIS_PROBE").as_deref().map(str::to_ascii_lowercase) {
            Some(v) if v == "off" || v == "false" || v == "0" => GisProbe::Disabled,
            _ => GisProbe::Enabled {
                gdalinfo_bin: lookup("GDAL_INFO_BIN").unwrap_or_else(|| "gdalinfo".to_string()),
            },
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            auth,
            gis_probe,
        })
    }
}

fn auth_settings<F>(lookup: &F) -> Result<AuthSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let algorithm = lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string());

    let key = match algorithm.to_ascii_uppercase().as_str() {
        "HS256" => {
            let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
            if secret.is_empty() {
                return Err(ConfigError::Invalid("JWT_SECRET"));
            }
            JwtKey::Hs256Secret(secret)
        }
        "EDDSA" => {
            let pem = lookup("JWT_PUBLIC_KEY_PEM")
                .ok_or(ConfigError::Missing("JWT_PUBLIC_KEY_PEM"))?
                .replace("\\n", "\n");
            JwtKey::EdDsaPublicPem(pem)
        }
        _ => return Err(ConfigError::Invalid("JWT_ALGORITHM")),
    };

    let issuer = lookup("AUTH_ISSUER").filter(|s| !s.trim().is_empty());
    let audience = lookup("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty());

    let leeway_seconds = match lookup("ACCESS_TOKEN_LEEWAY_SECONDS") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
        None => 0,
    };

    let header_name = lookup("AUTH_HEADER_NAME")
        .map(|s| s.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "authorization".to_string());
    if axum::http::HeaderName::from_str(&header_name).is_err() {
        return Err(ConfigError::Invalid("AUTH_HEADER_NAME"));
    }

    let header_types = split_list(
        &lookup("AUTH_HEADER_TYPES").unwrap_or_else(|| "Bearer,JWT".to_string()),
    );
    if header_types.is_empty() {
        return Err(ConfigError::Invalid("AUTH_HEADER_TYPES"));
    }

    let resolver_mode = match lookup("AUTH_RESOLVER_MODE") {
        Some(raw) => ResolverMode::from_str(&raw)
            .map_err(|_| ConfigError::Invalid("AUTH_RESOLVER_MODE"))?,
        None => ResolverMode::default(),
    };

    Ok(AuthSettings {
        key,
        issuer,
        audience,
        leeway_seconds,
        header_name,
        header_types,
        resolver_mode,
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_only_secret() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.database_url.is_none());
        assert_eq!(config.auth.header_name, "authorization");
        assert_eq!(config.auth.header_types, vec!["Bearer", "JWT"]);
        assert_eq!(config.auth.resolver_mode, ResolverMode::QueryThenHeader);
        assert_eq!(config.auth.leeway_seconds, 0);
        assert!(matches!(config.auth.key, JwtKey::Hs256Secret(_)));
        assert_eq!(
            config.gis_probe,
            GisProbe::Enabled {
                gdalinfo_bin: "gdalinfo".to_string()
            }
        );
    }

    #[test]
    fn missing_secret_fails_startup() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn eddsa_requires_public_key() {
        let err = Config::from_lookup(lookup_from(&[("JWT_ALGORITHM", "EdDSA")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_PUBLIC_KEY_PEM"));
    }

    #[test]
    fn rejects_unknown_resolver_mode() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("AUTH_RESOLVER_MODE", "cookie"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_RESOLVER_MODE"));
    }

    #[test]
    fn parses_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8000"),
            ("APP_ENV", "prod"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("JWT_SECRET", "s3cret"),
            ("AUTH_HEADER_TYPES", "JWT"),
            ("AUTH_RESOLVER_MODE", "query_only"),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "30"),
            ("GIS_PROBE", "off"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8000);
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.auth.header_types, vec!["JWT"]);
        assert_eq!(config.auth.resolver_mode, ResolverMode::QueryOnly);
        assert_eq!(config.auth.leeway_seconds, 30);
        assert_eq!(config.gis_probe, GisProbe::Disabled);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "http"), ("JWT_SECRET", "x")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }
}
