use std::env;

use anyhow::Context;

/// Per-deployment switches for routes whose access rules drifted between
/// server revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// GET /users/admin/{email} only answers for the caller's own email.
    pub admin_check_identity_match: bool,
    /// GET /order-stats requires an admin caller.
    pub order_stats_admin_only: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            admin_check_identity_match: true,
            order_stats_admin_only: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Shared secret for signing identity tokens
    pub token_secret: String,
    /// Payment provider secret key (None = intents are rejected)
    pub stripe_secret_key: Option<String>,
    pub policy: AccessPolicy,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    let Ok(value) = env::var(name) else {
        return default;
    };
    parse_flag(&value).unwrap_or_else(|| {
        tracing::warn!(name, value = %value, default, "Unrecognised boolean, using default");
        default
    })
}

/// Treat a blank value the same as an unset one.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let token_secret = non_blank(env::var("SECRET_TOKEN").ok())
            .context("SECRET_TOKEN must be set to a non-empty value to sign identity tokens")?;

        let defaults = AccessPolicy::default();
        let policy = AccessPolicy {
            admin_check_identity_match: env_flag(
                "ADMIN_CHECK_IDENTITY_MATCH",
                defaults.admin_check_identity_match,
            ),
            order_stats_admin_only: env_flag(
                "ORDER_STATS_ADMIN_ONLY",
                defaults.order_stats_admin_only,
            ),
        };

        Ok(Self {
            host,
            port,
            database_path: Self::database_path_from_env(),
            token_secret,
            stripe_secret_key: non_blank(env::var("STRIPE_SECRET_KEY").ok()),
            policy,
        })
    }

    /// Database location alone, for commands that don't serve requests.
    pub fn database_path_from_env() -> String {
        dotenvy::dotenv().ok();
        env::var("DATABASE_PATH").unwrap_or_else(|_| "bistro.db".to_string())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
