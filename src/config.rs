use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::pricing::TaxRate;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// HMAC secret bearer tokens are signed with.
    pub app_secret: String,
    pub host: String,
    pub port: u16,
    pub tax_rate: TaxRate,
    pub db_pool_size: u32,
}

impl AppConfig {
    /// Reads the configuration from the environment (after `.env`, if any,
    /// has been loaded by the caller).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let db_pool_size: u32 = parse_or(&lookup, "DB_POOL_SIZE", 10)?;
        if db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_POOL_SIZE",
                value: db_pool_size.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            app_secret: required("APP_SECRET")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            tax_rate: parse_or(&lookup, "TAX_RATE", TaxRate::default())?,
            db_pool_size,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bigdecimal::BigDecimal;

    use super::*;

    fn load(vars: &[(&'static str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = load(&[("DATABASE_URL", "postgres://db"), ("APP_SECRET", "s3cret")])
            .expect("valid config");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_pool_size, 10);
        assert_eq!(config.tax_rate.as_decimal(), &BigDecimal::from_str("0.10").expect("decimal"));
    }

    #[test]
    fn missing_secret_is_reported_by_name() {
        let err = load(&[("DATABASE_URL", "postgres://db")]).expect_err("secret missing");
        assert_eq!(err.to_string(), "APP_SECRET must be set");
    }

    #[test]
    fn negative_tax_rate_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("APP_SECRET", "s3cret"),
            ("TAX_RATE", "-0.1"),
        ])
        .expect_err("negative rate");
        assert!(matches!(err, ConfigError::Invalid { name: "TAX_RATE", .. }));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("APP_SECRET", "s3cret"),
            ("DB_POOL_SIZE", "0"),
        ])
        .expect_err("empty pool");
        assert!(matches!(err, ConfigError::Invalid { name: "DB_POOL_SIZE", .. }));
        assert_eq!(err.to_string(), "DB_POOL_SIZE has an invalid value '0'");
    }

    #[test]
    fn port_must_be_numeric() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("APP_SECRET", "s3cret"),
            ("PORT", "eighty"),
        ])
        .expect_err("bad port");
        assert_eq!(err.to_string(), "PORT has an invalid value 'eighty'");
    }
}
