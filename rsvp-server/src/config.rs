use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";
pub const DB_PATH_VAR: &str = "RSVP_DB_PATH";

const DEFAULT_DB_PATH: &str = "rsvp-db";

#[derive(Clone, Debug)]
pub struct Config {
    pub admin_password: String,
    pub db_path: PathBuf,
}

/// Read configuration from the environment once, at startup.
///
/// `ADMIN_PASSWORD` must be present. An empty value is accepted but
/// leaves the admin gate permanently closed.
pub fn load_config() -> Result<Config> {
    let admin_password = env::var(ADMIN_PASSWORD_VAR)
        .with_context(|| format!("{ADMIN_PASSWORD_VAR} must be set"))?;
    let db_path = env::var(DB_PATH_VAR).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    Ok(Config {
        admin_password,
        db_path: PathBuf::from(db_path),
    })
}
