use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};
use serde_json::Value;
use crate::app_config::{BusinessRules, DatabaseConfig};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Overlay rows of the `business_rules` table on top of the configured
    /// defaults. Values are stored as `{"value": <number|bool>}`.
    pub async fn fetch_business_rules(&self, defaults: BusinessRules) -> Result<BusinessRules, sqlx::Error> {
        let rows: Vec<(String, Value)> = sqlx::query_as("SELECT rule_key, rule_value FROM business_rules")
            .fetch_all(&self.pool)
            .await?;

        Ok(apply_rule_overrides(defaults, rows))
    }
}

fn apply_rule_overrides(defaults: BusinessRules, rows: Vec<(String, Value)>) -> BusinessRules {
    let mut rules = defaults;

    for (key, val) in rows {
        let Some(v) = val.get("value") else {
            warn!("Ignoring business rule {} without a value", key);
            continue;
        };

        match key.as_str() {
            "coupon_expiry_days" => {
                if let Some(days) = v.as_i64() {
                    rules.coupon_expiry_days = days;
                }
            }
            "partner_deal_limit" => {
                if let Some(limit) = v.as_u64() {
                    rules.partner_deal_limit = limit as usize;
                }
            }
            "enforce_coupon_expiry" => {
                if let Some(flag) = v.as_bool() {
                    rules.enforce_coupon_expiry = flag;
                }
            }
            "dependency_timeout_ms" => {
                if let Some(ms) = v.as_u64() {
                    rules.dependency_timeout_ms = ms;
                }
            }
            _ => {}
        }
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_overrides() {
        let rows = vec![
            ("coupon_expiry_days".to_string(), json!({"value": 14})),
            ("enforce_coupon_expiry".to_string(), json!({"value": true})),
            ("partner_deal_limit".to_string(), json!({"value": "five"})),
            ("unknown_rule".to_string(), json!({"value": 1})),
            ("dependency_timeout_ms".to_string(), json!(250)),
        ];

        let rules = apply_rule_overrides(BusinessRules::default(), rows);

        assert_eq!(rules.coupon_expiry_days, 14);
        assert!(rules.enforce_coupon_expiry);
        // Wrong type and missing "value" wrapper leave defaults in place
        assert_eq!(rules.partner_deal_limit, 3);
        assert_eq!(rules.dependency_timeout_ms, 5000);
    }
}
