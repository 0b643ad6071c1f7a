use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Where records, accounts and blobs live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    /// MySQL for records and accounts, local filesystem for blobs.
    Mysql,
    /// Everything in process memory; lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    pub api_prefix: String,

    pub blob_root: String,
    pub blob_public_url: String,
    pub max_upload_bytes: usize,

    pub log_dir: String,
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is invalid: {e}")),
        Err(_) => Ok(default),
    }
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let storage_backend = parsed("STORAGE_BACKEND", StorageBackend::Mysql)?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Mysql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=mysql");
        }

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            storage_backend,
            database_url,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", 900)?, // default 15 min
            refresh_token_ttl: parsed("REFRESH_TOKEN_TTL", 604_800)?, // default 7 days

            api_prefix: or_default("API_PREFIX", "/api"),

            blob_root: or_default("BLOB_ROOT", "data/blobs"),
            blob_public_url: or_default("BLOB_PUBLIC_URL", "http://localhost:8080/blobs"),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,

            log_dir: or_default("LOG_DIR", "logs"),
        })
    }
}
