use std::net::{IpAddr, SocketAddr};

use anyhow::Context;

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_MAX_SNAPSHOT_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone)]
pub struct Config {
    pub api_host: IpAddr,
    pub api_port: u16,
    /// Falls back to the in-memory version store when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub jwt_secret: String,
    pub frontend_url: Option<String>,
    pub max_snapshot_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_host = match get("API_HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid API_HOST: {raw}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            api_host,
            api_port: parse_value("API_PORT", get("API_PORT"))?.unwrap_or(DEFAULT_PORT),
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_value("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"))?
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            run_migrations: parse_flag(get("RUN_MIGRATIONS").as_deref(), true),
            jwt_secret,
            frontend_url: get("FRONTEND_URL"),
            max_snapshot_bytes: parse_value("MAX_SNAPSHOT_BYTES", get("MAX_SNAPSHOT_BYTES"))?
                .unwrap_or(DEFAULT_MAX_SNAPSHOT_BYTES),
        })
    }

    /// Defaults for tests and embedding; no database, no CORS origin.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            api_host: IpAddr::from([127, 0, 0, 1]),
            api_port: DEFAULT_PORT,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            run_migrations: false,
            jwt_secret: jwt_secret.into(),
            frontend_url: None,
            max_snapshot_bytes: DEFAULT_MAX_SNAPSHOT_BYTES,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.api_host, self.api_port)
    }
}

fn parse_value<T>(key: &str, raw: Option<String>) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map(|raw| {
        raw.trim()
            .parse::<T>()
            .with_context(|| format!("invalid {key}: {raw}"))
    })
    .transpose()
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1") | Some("true") | Some("yes") | Some("on") => true,
        Some("0") | Some("false") | Some("no") | Some("off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.api_port, 8787);
        assert_eq!(cfg.api_host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(cfg.db_max_connections, 10);
        assert!(cfg.run_migrations);
        assert_eq!(cfg.max_snapshot_bytes, 16 * 1024 * 1024);
        assert!(cfg.database_url.is_none());
        assert!(cfg.frontend_url.is_none());
    }

    #[test]
    fn missing_or_blank_secret_is_an_error() {
        let err = config_from(&[]).err().unwrap();
        assert!(err.to_string().contains("JWT_SECRET"));
        assert!(config_from(&[("JWT_SECRET", "   ")]).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", " 9000 "),
            ("DB_MAX_CONNECTIONS", "3"),
            ("RUN_MIGRATIONS", "off"),
            ("MAX_SNAPSHOT_BYTES", "1024"),
            ("DATABASE_URL", "postgres://localhost/flux"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(cfg.db_max_connections, 3);
        assert!(!cfg.run_migrations);
        assert_eq!(cfg.max_snapshot_bytes, 1024);
        assert_eq!(
            cfg.database_url.as_deref(),
            Some("postgres://localhost/flux")
        );
    }

    #[test]
    fn malformed_numbers_name_the_variable() {
        let err = config_from(&[("JWT_SECRET", "s"), ("API_PORT", "http")])
            .err()
            .unwrap();
        assert!(err.to_string().contains("API_PORT"));
        assert!(parse_value::<usize>("MAX_SNAPSHOT_BYTES", Some("-1".into())).is_err());
        assert_eq!(parse_value::<u32>("X", None).unwrap(), None);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag(Some("TRUE"), false));
        assert!(parse_flag(Some(" yes "), false));
        assert!(parse_flag(Some("1"), false));
        assert!(!parse_flag(Some("No"), true));
        assert!(!parse_flag(Some("0"), true));
        assert!(parse_flag(Some("maybe"), true));
        assert!(!parse_flag(None, false));
    }
}
