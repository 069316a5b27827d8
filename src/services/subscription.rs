//! Subscription Service
//!
//! Free/pro plan tracking. Users without a record are on the free plan, and a
//! pro period that has run out is downgraded the next time it is checked.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::models::{Plan, Subscription, SubscriptionCheck, SubscriptionStatus};
use crate::storage::Database;
use crate::utils::error::AppResult;

/// Length of a paid pro period in days
pub const PRO_PERIOD_DAYS: i64 = 30;

/// Service for checking and activating subscriptions
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    db: Database,
}

impl SubscriptionService {
    /// Create a new subscription service
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve the user's current plan, persisting a downgrade if the pro
    /// period ended before `now`.
    pub fn check(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<SubscriptionCheck> {
        let Some(mut subscription) = self.db.get_subscription(user_id)? else {
            return Ok(SubscriptionCheck {
                is_active: true,
                plan: Plan::Free,
                end_date: None,
                expired: false,
            });
        };

        if subscription.plan == Plan::Free {
            return Ok(SubscriptionCheck {
                is_active: true,
                plan: Plan::Free,
                end_date: subscription.end_date,
                expired: false,
            });
        }

        match subscription.end_date {
            Some(end_date) if end_date > now => Ok(SubscriptionCheck {
                is_active: true,
                plan: Plan::Pro,
                end_date: Some(end_date),
                expired: false,
            }),
            _ => {
                subscription.plan = Plan::Free;
                subscription.status = SubscriptionStatus::Expired;
                subscription.end_date = Some(now);
                subscription.updated_at = now;
                self.db.upsert_subscription(&subscription)?;

                info!(user_id = %user_id, "Pro subscription expired, downgraded to free");
                Ok(SubscriptionCheck {
                    is_active: true,
                    plan: Plan::Free,
                    end_date: None,
                    expired: true,
                })
            }
        }
    }

    /// Start a pro period for a verified payment
    pub fn activate_pro(
        &self,
        user_id: &str,
        payment_id: &str,
        order_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Subscription> {
        let subscription = Subscription {
            user_id: user_id.to_string(),
            plan: Plan::Pro,
            status: SubscriptionStatus::Active,
            payment_id: Some(payment_id.to_string()),
            order_id: Some(order_id.to_string()),
            start_date: now,
            end_date: Some(now + Duration::days(PRO_PERIOD_DAYS)),
            updated_at: now,
        };
        self.db.upsert_subscription(&subscription)?;

        info!(user_id = %user_id, order_id = %order_id, "Pro subscription activated");
        Ok(subscription)
    }

    /// Whether the user currently has pro features
    pub fn is_pro(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<bool> {
        Ok(self.check(user_id, now)?.plan == Plan::Pro)
    }
}
