use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum_extra::extract::cookie::Key;
use eyre::{WrapErr, eyre};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("dev") | None => Env::Dev,
            Some("staging") => Env::Staging,
            Some("production") => Env::Production,
            Some(other) => {
                tracing::warn!("Unknown ENVIRONMENT `{other}`, falling back to dev");
                Env::Dev
            }
        }
    }

    pub fn from_env() -> Self {
        Env::parse(std::env::var("ENVIRONMENT").ok().as_deref())
    }
}

pub struct ServerConfig {
    pub env: Env,
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// Signs the session cookie.
    pub session_key: Key,
    pub session_ttl: chrono::Duration,
    pub seed_fixtures: bool,
}

const DEFAULT_DATABASE_URL: &str = "blog.db";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

fn var(key: &str) -> eyre::Result<Option<String>> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(eyre!(
            "Could not get the environment variable `{key}` due to unicode error"
        )),
    }
}

fn parsed_var<T>(
    lookup: &impl Fn(&str) -> eyre::Result<Option<String>>,
    key: &str,
    default: T,
) -> eyre::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key)? {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Environment variable `{key}` is invalid: `{raw}`")),
        None => Ok(default),
    }
}

impl ServerConfig {
    pub fn new_from_env() -> eyre::Result<Self> {
        Self::from_lookup(var)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> eyre::Result<Option<String>>) -> eyre::Result<Self> {
        let env = Env::parse(lookup("ENVIRONMENT")?.as_deref());

        let host: IpAddr = parsed_var(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parsed_var(&lookup, "PORT", DEFAULT_PORT)?;

        let session_key = match lookup("SESSION_SECRET")? {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
                eyre!("Environment variable `SESSION_SECRET` must be at least 64 bytes long")
            })?,
            None if env == Env::Dev => {
                tracing::warn!(
                    "SESSION_SECRET is not set, using a random key. Sessions will not survive a restart"
                );
                Key::generate()
            }
            None => return Err(eyre!("Environment variable `SESSION_SECRET` is required")),
        };

        let ttl_days: i64 = parsed_var(&lookup, "SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS)?;
        let session_ttl = chrono::Duration::try_days(ttl_days)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .ok_or_else(|| eyre!("SESSION_TTL_DAYS must be a positive number of days"))?;

        Ok(ServerConfig {
            env,
            database_url: lookup("DATABASE_URL")?
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            listen_addr: SocketAddr::new(host, port),
            session_key,
            session_ttl,
            seed_fixtures: parsed_var(&lookup, "SEED_FIXTURES", true)?,
        })
    }

    pub fn secure_cookies(&self) -> bool {
        self.env == Env::Production
    }
}
