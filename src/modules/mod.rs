pub mod gateways;
pub mod paypal;
pub mod transactions;
