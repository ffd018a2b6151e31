use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use super::gateway_trait::GatewayAdapter;
use crate::core::error::{AppError, Result};
use crate::modules::gateways::models::{
    Completion, GatewayPayment, PaymentDetails, PaymentInitiation,
};
use crate::modules::transactions::{GatewayFields, PaymentProcess, TransactionRecord};

/// Service for selecting and invoking gateway adapters
pub struct GatewayService {
    adapters: HashMap<String, Arc<dyn GatewayAdapter>>,
}

impl GatewayService {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter under its own name, replacing any previous one
    pub fn register_adapter(&mut self, adapter: Arc<dyn GatewayAdapter>) {
        let name = adapter.name().to_string();
        self.adapters.insert(name, adapter);
    }

    /// Get an adapter by name
    pub fn get_adapter(&self, name: &str) -> Result<Arc<dyn GatewayAdapter>> {
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Gateway '{}' not found", name)))
    }

    /// Adapter for a transaction, checked against its payment process
    pub fn adapter_for(&self, tx: &TransactionRecord) -> Result<Arc<dyn GatewayAdapter>> {
        tx.validate()?;

        let adapter = self.get_adapter(&tx.payment_gateway)?;
        if !adapter.implements_process(tx.payment_process) {
            return Err(AppError::validation(format!(
                "Gateway '{}' does not implement the '{}' payment process",
                tx.payment_gateway, tx.payment_process
            )));
        }

        Ok(adapter)
    }

    pub async fn create_payment(
        &self,
        tx: &TransactionRecord,
        gateway_fields: &GatewayFields,
        prefer_async: bool,
    ) -> Result<Completion<PaymentInitiation>> {
        let adapter = self.adapter_for(tx)?;
        let total = tx.total_price()?;
        info!(
            gateway = %tx.payment_gateway,
            transaction_id = tx.id,
            community_id = tx.community_id,
            total = %total,
            prefer_async,
            "Creating payment with gateway"
        );

        let completion = adapter
            .create_payment(tx, gateway_fields, prefer_async)
            .await;

        log_completion("create_payment", tx, &completion);
        Ok(completion)
    }

    pub async fn reject_payment(
        &self,
        tx: &TransactionRecord,
        reason: &str,
    ) -> Result<Completion<Option<GatewayPayment>>> {
        info!(
            gateway = %tx.payment_gateway,
            transaction_id = tx.id,
            reason = %reason,
            "Rejecting payment"
        );

        let adapter = self.adapter_for(tx)?;
        let completion = adapter.reject_payment(tx, reason).await;

        log_completion("reject_payment", tx, &completion);
        Ok(completion)
    }

    pub async fn complete_preauthorization(
        &self,
        tx: &TransactionRecord,
    ) -> Result<Completion<Option<GatewayPayment>>> {
        info!(
            gateway = %tx.payment_gateway,
            transaction_id = tx.id,
            "Completing preauthorization"
        );

        let adapter = self.adapter_for(tx)?;
        let completion = adapter.complete_preauthorization(tx).await;

        log_completion("complete_preauthorization", tx, &completion);
        Ok(completion)
    }

    pub async fn get_payment_details(&self, tx: &TransactionRecord) -> Result<PaymentDetails> {
        let adapter = self.adapter_for(tx)?;
        adapter.get_payment_details(tx).await
    }

    /// List all registered gateways, sorted by name
    pub fn list_gateways(&self) -> Vec<GatewayInfo> {
        let mut gateways: Vec<GatewayInfo> = self
            .adapters
            .values()
            .map(|adapter| GatewayInfo {
                name: adapter.name().to_string(),
                processes: adapter.processes(),
            })
            .collect();
        gateways.sort_by(|a, b| a.name.cmp(&b.name));
        gateways
    }
}

impl Default for GatewayService {
    fn default() -> Self {
        Self::new()
    }
}

fn log_completion<T>(operation: &str, tx: &TransactionRecord, completion: &Completion<T>) {
    match completion.response() {
        Ok(_) => info!(
            gateway = %tx.payment_gateway,
            transaction_id = tx.id,
            operation,
            sync = completion.is_sync(),
            "Gateway operation succeeded"
        ),
        Err(e) => error!(
            gateway = %tx.payment_gateway,
            transaction_id = tx.id,
            operation,
            sync = completion.is_sync(),
            error = %e,
            "Gateway operation failed"
        ),
    }
}

/// Gateway information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct GatewayInfo {
    pub name: String,
    pub processes: Vec<PaymentProcess>,
}
