use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use crate::models::store::StoreId;

/// Coupon usage state. `Unused` is initial, `Used` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus {
    Unused,
    Used,
}

impl CouponStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponStatus::Unused => "unused",
            CouponStatus::Used => "used",
        }
    }
}

impl fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unused" => Ok(CouponStatus::Unused),
            "used" => Ok(CouponStatus::Used),
            other => Err(format!("unknown coupon status: {}", other)),
        }
    }
}

/// A single-use coupon handed out on a store page, redeemable at the partner
/// store that owns the deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCoupon {
    pub id: Uuid,
    pub deal_id: i64,
    pub origin_store_id: StoreId,
    pub status: CouponStatus,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl IssuedCoupon {
    pub fn new(new: NewIssuedCoupon, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            deal_id: new.deal_id,
            origin_store_id: new.origin_store_id,
            status: CouponStatus::Unused,
            expires_at: new.expires_at,
            used_at: None,
            created_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Compare-and-set `Unused → Used`. Returns whether the transition
    /// happened; a used coupon is left untouched.
    pub fn try_mark_used(&mut self, now: DateTime<Utc>, require_unexpired: bool) -> bool {
        if self.status != CouponStatus::Unused {
            return false;
        }
        if require_unexpired && self.is_expired_at(now) {
            return false;
        }
        self.status = CouponStatus::Used;
        self.used_at = Some(now);
        true
    }
}

/// Payload for issuing a coupon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssuedCoupon {
    pub deal_id: i64,
    pub origin_store_id: StoreId,
    pub expires_at: DateTime<Utc>,
}

/// Coupon joined with its deal and the store where it is redeemed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponView {
    pub id: Uuid,
    pub status: CouponStatus,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub origin_store_id: StoreId,
    pub deal: CouponDealView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDealView {
    pub id: i64,
    pub description: String,
    pub conditions: Option<String>,
    pub store_id: StoreId,
    pub store_name: String,
    pub map_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(expires_in: Duration) -> IssuedCoupon {
        let now = Utc::now();
        IssuedCoupon::new(
            NewIssuedCoupon {
                deal_id: 1,
                origin_store_id: "origin".into(),
                expires_at: now + expires_in,
            },
            now,
        )
    }

    #[test]
    fn test_mark_used_once() {
        let mut c = coupon(Duration::days(7));
        let first = Utc::now();

        assert!(c.try_mark_used(first, false));
        assert_eq!(c.status, CouponStatus::Used);
        assert_eq!(c.used_at, Some(first));

        // Second attempt must not touch used_at
        assert!(!c.try_mark_used(first + Duration::seconds(5), false));
        assert_eq!(c.used_at, Some(first));
    }

    #[test]
    fn test_expired_coupon_only_rejected_when_enforced() {
        let mut c = coupon(Duration::days(-1));
        assert!(!c.try_mark_used(Utc::now(), true));
        assert_eq!(c.status, CouponStatus::Unused);
        assert!(c.used_at.is_none());

        assert!(c.try_mark_used(Utc::now(), false));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        assert_eq!("used".parse::<CouponStatus>().unwrap(), CouponStatus::Used);
        assert_eq!(CouponStatus::Unused.to_string(), "unused");
        assert!("cancelled".parse::<CouponStatus>().is_err());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let c = coupon(Duration::days(7));
        let view = CouponView {
            id: c.id,
            status: c.status,
            expires_at: c.expires_at,
            used_at: None,
            origin_store_id: c.origin_store_id,
            deal: CouponDealView {
                id: 1,
                description: "Free refill".into(),
                conditions: None,
                store_id: "cafe-1".into(),
                store_name: "Morning Cafe".into(),
                map_url: None,
            },
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["originStoreId"], "origin");
        assert_eq!(json["status"], "unused");
        assert!(json["usedAt"].is_null());
        assert!(json.get("expiresAt").is_some());
        assert_eq!(json["deal"]["storeName"], "Morning Cafe");
        assert!(json["deal"].get("store_name").is_none());
    }
}
