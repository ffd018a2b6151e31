pub mod free_adapter;
pub mod gateway_service;
pub mod gateway_trait;
pub mod paypal_adapter;

pub use free_adapter::FreeAdapter;
pub use gateway_service::{GatewayInfo, GatewayService};
pub use gateway_trait::GatewayAdapter;
pub use paypal_adapter::PaypalAdapter;
