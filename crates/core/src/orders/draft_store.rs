//! In-memory store for orders being assembled step by step.
//!
//! The assembly flow spans several user interactions, so the intermediate
//! state lives here under a generated session id with a TTL, not in any
//! process-global map. Expired drafts are dropped lazily on access and by
//! [`OrderDraftStore::purge_expired`], which hosts may call on a timer.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::debug;
use uuid::Uuid;

use super::orders_constants::ORDER_DRAFT_TTL_SECS;
use crate::errors::{Error, Result};

/// An order under construction.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub attendant_id: String,
    pub customer_name: String,
    pub notes: Option<String>,
    /// Selected quantity per product id; zero removes the line.
    pub items: HashMap<String, i64>,
    opened_at: Instant,
}

pub struct OrderDraftStore {
    drafts: DashMap<String, OrderDraft>,
    ttl: Duration,
}

impl Default for OrderDraftStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(ORDER_DRAFT_TTL_SECS))
    }
}

impl OrderDraftStore {
    pub fn new(ttl: Duration) -> Self {
        OrderDraftStore {
            drafts: DashMap::new(),
            ttl,
        }
    }

    /// Opens a new draft and returns its session id.
    pub fn open(&self, attendant_id: &str, customer_name: &str, notes: Option<String>) -> String {
        let draft_id = Uuid::new_v4().to_string();
        self.drafts.insert(
            draft_id.clone(),
            OrderDraft {
                attendant_id: attendant_id.to_string(),
                customer_name: customer_name.to_string(),
                notes,
                items: HashMap::new(),
                opened_at: Instant::now(),
            },
        );
        draft_id
    }

    /// Sets the quantity for a product line; zero removes it.
    pub fn set_item(&self, draft_id: &str, product_id: &str, quantity: i64) -> Result<()> {
        let mut entry = self
            .drafts
            .get_mut(draft_id)
            .filter(|d| !self.is_expired(d))
            .ok_or_else(Self::expired_error)?;
        if quantity > 0 {
            entry.items.insert(product_id.to_string(), quantity);
        } else {
            entry.items.remove(product_id);
        }
        Ok(())
    }

    /// Removes and returns a draft for placement.
    pub fn take(&self, draft_id: &str) -> Result<OrderDraft> {
        let (_, draft) = self
            .drafts
            .remove(draft_id)
            .ok_or_else(Self::expired_error)?;
        if self.is_expired(&draft) {
            return Err(Self::expired_error());
        }
        Ok(draft)
    }

    /// Drops every expired draft; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.drafts.len();
        self.drafts.retain(|_, draft| !self.is_expired(draft));
        let purged = before.saturating_sub(self.drafts.len());
        if purged > 0 {
            debug!("Purged {} expired order drafts", purged);
        }
        purged
    }

    fn is_expired(&self, draft: &OrderDraft) -> bool {
        draft.opened_at.elapsed() >= self.ttl
    }

    fn expired_error() -> Error {
        Error::Conflict("Order draft expired or not found; start a new order".to_string())
    }
}
