use serde::Deserialize;
use chrono::{DateTime, Duration, Utc};
use crosspromo_core::{CoreError, CoreResult};
use crosspromo_shared::{NewIssuedCoupon, StoreId};

/// Raw issuance input as submitted from a store page form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCouponRequest {
    pub deal_id: Option<String>,
    #[serde(rename = "originId")]
    pub origin_store_id: Option<String>,
    pub expiry_days: Option<String>,
}

impl IssueCouponRequest {
    pub fn new(deal_id: &str, origin_store_id: &str, expiry_days: &str) -> Self {
        Self {
            deal_id: Some(deal_id.to_string()),
            origin_store_id: Some(origin_store_id.to_string()),
            expiry_days: Some(expiry_days.to_string()),
        }
    }

    /// Check and convert the form fields. Nothing is written on failure.
    pub fn validate(&self, now: DateTime<Utc>) -> CoreResult<NewIssuedCoupon> {
        let (Some(deal_id), Some(origin_store_id), Some(expiry_days)) = (
            present(&self.deal_id),
            present(&self.origin_store_id),
            present(&self.expiry_days),
        ) else {
            return Err(CoreError::validation("dealId, originId and expiryDays are required"));
        };

        let (Ok(deal_id), Ok(expiry_days)) = (deal_id.parse::<i64>(), expiry_days.parse::<i64>()) else {
            return Err(CoreError::validation("dealId and expiryDays must be integers"));
        };

        if expiry_days < 0 {
            return Err(CoreError::validation("expiryDays must not be negative"));
        }

        let expires_at = Duration::try_days(expiry_days)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| CoreError::validation("expiryDays is out of range"))?;

        Ok(NewIssuedCoupon {
            deal_id,
            origin_store_id: StoreId::new(origin_store_id),
            expires_at,
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
