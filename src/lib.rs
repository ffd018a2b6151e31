//! PayBridge payment gateway adapter service
//!
//! Translates marketplace transactions into payment gateway calls
//! (create payment, void, capture, payment details) and reports each
//! gateway outcome back as a sync or async completion.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::gateways;
pub use modules::paypal;
pub use modules::transactions;
