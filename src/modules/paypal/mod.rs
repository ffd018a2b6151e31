//! PayPal REST integration used by the PayPal gateway adapter

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{
    CreatePaymentRequest, Payment, PaymentInfo, PaymentState, ProcessStatus, RequestOutcome,
    VoidInfo,
};
pub use services::{PaymentStore, PaypalApi, PaypalClient, ProcessRegistry};
