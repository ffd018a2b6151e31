mod data_types;

pub use data_types::{
    CreatePaymentRequest, Payment, PaymentInfo, PaymentState, ProcessStatus, RequestOutcome,
    VoidInfo,
};
