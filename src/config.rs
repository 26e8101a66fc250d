use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("unknown APP_ENV '{}'", other),
        }
    }
}

/// Where a terminal capture state sends the browser, and after how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub delay: Duration,
}

impl Redirect {
    pub fn new(path: impl Into<String>, delay_secs: u64) -> Self {
        Self {
            path: path.into(),
            delay: Duration::from_secs(delay_secs),
        }
    }

    /// Value for the `Refresh` response header.
    pub fn refresh_header(&self) -> String {
        format!("{}; url={}", self.delay.as_secs(), self.path)
    }
}

#[derive(Debug, Clone)]
pub struct RedirectConfig {
    pub success: Redirect,
    pub failure: Redirect,
    pub no_data: Redirect,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            success: Redirect::new("/dashboard", 2),
            failure: Redirect::new("/?capture=failed", 3),
            no_data: Redirect::new("/", 3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub allowed_origins: Vec<String>,
    pub ip_hash_salt: String,
    pub redirects: RedirectConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: Environment::Development,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            ip_hash_salt: "creatorfunnel_salt".to_string(),
            redirects: RedirectConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();
        let redirects = RedirectConfig {
            success: load_redirect("CAPTURE_SUCCESS", defaults.redirects.success)?,
            failure: load_redirect("CAPTURE_FAILURE", defaults.redirects.failure)?,
            no_data: load_redirect("CAPTURE_NO_DATA", defaults.redirects.no_data)?,
        };

        let allowed_origins = match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => defaults.allowed_origins,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            environment: parse_var("APP_ENV", defaults.environment)?,
            allowed_origins,
            ip_hash_salt: env::var("IP_HASH_SALT").unwrap_or(defaults.ip_hash_salt),
            redirects,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Error detail for a 500 body; hidden outside development.
    pub fn expose_detail(&self, detail: impl ToString) -> Option<String> {
        match self.environment {
            Environment::Development => Some(detail.to_string()),
            Environment::Production => None,
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Invalid value for {}", key)),
        Err(_) => Ok(default),
    }
}

fn load_redirect(prefix: &str, default: Redirect) -> Result<Redirect> {
    let path = env::var(format!("{}_PATH", prefix)).unwrap_or(default.path);
    let delay_secs = parse_var(&format!("{}_DELAY_SECS", prefix), default.delay.as_secs())?;
    Ok(Redirect::new(path, delay_secs))
}
