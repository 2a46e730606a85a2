use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub allowed_origin: String,
    pub trusted_proxies: Vec<IpNet>,
    pub honeypot_field: String,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub http_timeout_secs: u64,
    pub log_level: String,
    pub mail: MailConfig,
}

/// Credentials and addresses for the identity provider and mail-send API.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub sender: String,
    pub recipient: String,
    pub authority_url: String,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| env_or(&lookup, key, default);
        let env_required = |key: &str| env_required(&lookup, key);

        let host: IpAddr = env_or("CONTACT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_HOST: {e}"))?;

        let port: u16 = env_or("CONTACT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_PORT: {e}"))?;

        let max_body_size: usize = env_or("CONTACT_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_MAX_BODY_SIZE: {e}"))?;

        let allowed_origin = env_or("CONTACT_ALLOWED_ORIGIN", "*");

        let trusted_proxies = parse_proxies(&env_or("CONTACT_TRUSTED_PROXIES", ""))?;

        let honeypot_field = env_or("CONTACT_HONEYPOT_FIELD", "honeypot");

        let rate_limit: u32 = env_or("CONTACT_RATE_LIMIT", "5")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("CONTACT_RATE_LIMIT_WINDOW_SECS", "600")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let http_timeout_secs: u64 = env_or("CONTACT_HTTP_TIMEOUT_SECS", "15")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_HTTP_TIMEOUT_SECS: {e}"))?;

        let log_level = env_or("CONTACT_LOG_LEVEL", "info");

        let mail = MailConfig {
            tenant_id: env_required("MAIL_TENANT_ID")?,
            client_id: env_required("MAIL_CLIENT_ID")?,
            client_secret: env_required("MAIL_CLIENT_SECRET")?,
            sender: env_required("MAIL_SENDER")?,
            recipient: env_required("MAIL_RECIPIENT")?,
            authority_url: trim_url(env_or(
                "MAIL_AUTHORITY_URL",
                "https://login.microsoftonline.com",
            )),
            api_url: trim_url(env_or("MAIL_API_URL", "https://graph.microsoft.com")),
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            allowed_origin,
            trusted_proxies,
            honeypot_field,
            rate_limit,
            rate_limit_window_secs,
            http_timeout_secs,
            log_level,
            mail,
        })
    }
}

fn env_required(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<String, String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parse_proxies(raw: &str) -> Result<Vec<IpNet>, String> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse()
                .map_err(|e| format!("Invalid CONTACT_TRUSTED_PROXIES entry '{s}': {e}"))
        })
        .collect()
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
