use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::paypal::models::{Payment, PaymentState};

type PaymentKey = (i64, i64);

/// In-memory payment records keyed by (community_id, transaction_id)
#[derive(Debug, Clone, Default)]
pub struct PaymentStore {
    payments: Arc<RwLock<HashMap<PaymentKey, Payment>>>,
}

impl PaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new checkout for a transaction
    ///
    /// An earlier record may be replaced only while it holds no funds.
    pub async fn insert(&self, payment: Payment) -> Result<()> {
        let key = (payment.community_id, payment.transaction_id);
        let mut payments = self.payments.write().await;
        if let Some(existing) = payments.get(&key) {
            check_replaceable(existing)?;
        }

        payments.insert(key, payment);
        Ok(())
    }

    /// Fails when a new checkout would replace an authorized or captured payment
    pub async fn ensure_replaceable(&self, community_id: i64, transaction_id: i64) -> Result<()> {
        match self.payments.read().await.get(&(community_id, transaction_id)) {
            Some(existing) => check_replaceable(existing),
            None => Ok(()),
        }
    }

    pub async fn get(&self, community_id: i64, transaction_id: i64) -> Result<Payment> {
        self.payments
            .read()
            .await
            .get(&(community_id, transaction_id))
            .cloned()
            .ok_or_else(|| not_found(community_id, transaction_id))
    }

    /// Apply `change` to a stored payment and return the updated copy
    pub async fn update<F>(&self, community_id: i64, transaction_id: i64, change: F) -> Result<Payment>
    where
        F: FnOnce(&mut Payment),
    {
        let mut payments = self.payments.write().await;
        let payment = payments
            .get_mut(&(community_id, transaction_id))
            .ok_or_else(|| not_found(community_id, transaction_id))?;

        change(payment);
        payment.updated_at = Utc::now();

        Ok(payment.clone())
    }

    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }
}

fn check_replaceable(existing: &Payment) -> Result<()> {
    let progress = match existing.state {
        PaymentState::Authorized => "authorized",
        PaymentState::Captured => "captured",
        PaymentState::Pending | PaymentState::Voided => return Ok(()),
    };

    Err(AppError::validation(format!(
        "PayPal payment for transaction {} is already {}",
        existing.transaction_id, progress
    )))
}

fn not_found(community_id: i64, transaction_id: i64) -> AppError {
    AppError::not_found(format!(
        "PayPal payment for transaction {} in community {}",
        transaction_id, community_id
    ))
}
