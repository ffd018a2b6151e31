pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{
    Completion, CompletionBody, GatewayPayment, PaymentDetails, PaymentInitiation, PaymentStatus,
};
pub use services::{
    FreeAdapter, GatewayAdapter, GatewayInfo, GatewayService, PaypalAdapter,
};
