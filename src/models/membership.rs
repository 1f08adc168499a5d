use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::{add_days, days_until, is_expired};

/// A purchased bundle of class credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Membership {
    /// Plan name as shown at purchase time
    pub plan: String,
    /// Optional dance style restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub remaining_classes: u32,
    pub total_classes: u32,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(
        plan: impl Into<String>,
        style: Option<String>,
        class_count: u32,
        purchased_at: DateTime<Utc>,
        validity_days: u32,
    ) -> Self {
        Self {
            plan: plan.into(),
            style,
            remaining_classes: class_count,
            total_classes: class_count,
            purchased_at,
            expires_at: add_days(purchased_at, validity_days),
        }
    }

    pub fn has_classes_left(&self) -> bool {
        self.remaining_classes > 0
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }

    /// Days left before expiry, never negative
    pub fn days_remaining(&self, now: DateTime<Utc>) -> u32 {
        days_until(self.expires_at, now).max(0) as u32
    }

    /// Whether a class of `class_name` may be booked against this membership.
    ///
    /// No restriction, the catch-all label, or an exact style match all pass.
    pub fn style_matches(&self, class_name: &str, all_styles_label: &str) -> bool {
        match &self.style {
            None => true,
            Some(style) => style == all_styles_label || style == class_name,
        }
    }

    /// Take one credit. Returns false when none are left.
    pub fn consume_class(&mut self) -> bool {
        if self.remaining_classes == 0 {
            return false;
        }
        self.remaining_classes -= 1;
        true
    }

    /// Give back one credit, never above the granted total.
    pub fn refund_class(&mut self) {
        if self.remaining_classes < self.total_classes {
            self.remaining_classes += 1;
        }
    }
}
