//! Subscription intake: validate-and-upsert of visitor email addresses.

use std::sync::Arc;

use crate::application::repos::{RepoError, SubscriptionsRepo};
use crate::domain::entities::SubscriptionRecord;

#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    /// The email is stored (created now or already present).
    Subscribed(SubscriptionRecord),
    /// The input failed validation; nothing was written.
    Invalid,
}

#[derive(Clone)]
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionsRepo>,
}

impl SubscriptionService {
    pub fn new(subscriptions: Arc<dyn SubscriptionsRepo>) -> Self {
        Self { subscriptions }
    }

    /// Accepts any non-empty string containing an `@`. This deliberately
    /// weak check is a documented contract of the original system and is
    /// preserved as-is; repeated submissions of the same email are no-ops.
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, RepoError> {
        if email.is_empty() || !email.contains('@') {
            return Ok(SubscribeOutcome::Invalid);
        }

        let record = self.subscriptions.get_or_create(email).await?;
        Ok(SubscribeOutcome::Subscribed(record))
    }
}
