use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::store::StoreId;

/// A reusable coupon offer owned by one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealTemplate {
    pub id: i64,
    pub store_id: StoreId,
    pub description: String,
    pub conditions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a deal template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDealTemplate {
    pub store_id: StoreId,
    pub description: String,
    pub conditions: Option<String>,
}

/// A partner's deal as shown on a store page, ready for issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDeal {
    pub id: i64,
    pub store_id: StoreId,
    pub description: String,
    pub conditions: Option<String>,
    pub store_name: String,
    pub map_url: Option<String>,
    pub expiry_days: i64,
}

impl PartnerDeal {
    pub fn new(deal: DealTemplate, store_name: String, map_url: Option<String>, expiry_days: i64) -> Self {
        Self {
            id: deal.id,
            store_id: deal.store_id,
            description: deal.description,
            conditions: deal.conditions,
            store_name,
            map_url,
            expiry_days,
        }
    }
}

/// Deals offered on one store's page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDeals {
    pub origin_store_id: StoreId,
    pub store_name: String,
    pub deals: Vec<PartnerDeal>,
}
