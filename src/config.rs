use std::env;
use std::path::PathBuf;

use anyhow::Context;

/// Runtime configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Root directory for uploaded documents, partitioned per request.
    pub upload_root: PathBuf,
    /// Root directory for rendered letter artifacts.
    pub artifact_root: PathBuf,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub relay: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:8080"));
        let upload_root =
            PathBuf::from(env::var("UPLOAD_ROOT").unwrap_or_else(|_| String::from("./uploads")));
        let artifact_root = PathBuf::from(
            env::var("ARTIFACT_ROOT").unwrap_or_else(|_| String::from("./artifacts")),
        );

        Ok(AppConfig {
            bind_addr,
            upload_root,
            artifact_root,
            smtp: SmtpConfig::from_env()?,
        })
    }
}

impl SmtpConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let relay = env::var("SMTP_RELAY").unwrap_or_else(|_| String::from("smtp.gmail.com"));
        let username = env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?;
        let password = env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?;
        let from_address = env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

        Ok(SmtpConfig {
            relay,
            username,
            password,
            from_address,
        })
    }
}
