pub mod api;
pub mod client;
pub mod payment_store;
pub mod process_registry;

pub use api::PaypalApi;
pub use client::PaypalClient;
pub use payment_store::PaymentStore;
pub use process_registry::ProcessRegistry;
