mod completion;
mod payment;

pub use completion::{Completion, CompletionBody};
pub use payment::{GatewayPayment, PaymentDetails, PaymentInitiation, PaymentStatus};
