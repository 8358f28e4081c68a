use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BusinessRules {
    /// Validity window attached to partner deals shown on a store page.
    #[serde(default = "default_coupon_expiry_days")]
    pub coupon_expiry_days: i64,
    #[serde(default = "default_partner_deal_limit")]
    pub partner_deal_limit: usize,
    /// Reject redemption of coupons past `expires_at`. Off by default: the
    /// expiry date is informational unless this is turned on.
    #[serde(default)]
    pub enforce_coupon_expiry: bool,
    #[serde(default = "default_dependency_timeout_ms")]
    pub dependency_timeout_ms: u64,
}

fn default_coupon_expiry_days() -> i64 { 7 }
fn default_partner_deal_limit() -> usize { 3 }
fn default_dependency_timeout_ms() -> u64 { 5000 }

impl BusinessRules {
    pub fn dependency_timeout(&self) -> Duration {
        Duration::from_millis(self.dependency_timeout_ms)
    }
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            coupon_expiry_days: default_coupon_expiry_days(),
            partner_deal_limit: default_partner_deal_limit(),
            enforce_coupon_expiry: false,
            dependency_timeout_ms: default_dependency_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout_secs() -> u64 { 3 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `CROSSPROMO__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("CROSSPROMO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
