pub mod models;

pub use models::{GatewayFields, PaymentProcess, TransactionRecord};
