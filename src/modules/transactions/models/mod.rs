mod transaction_record;

pub use transaction_record::{GatewayFields, PaymentProcess, TransactionRecord};
