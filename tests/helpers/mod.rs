// Test Helper Modules
//
// Shared by integration and unit test binaries through
// `#[path = "../helpers/mod.rs"] mod helpers;`.
#![allow(dead_code)]

pub mod fake_paypal;
pub mod test_app;

pub use fake_paypal::*;
pub use test_app::*;
pub use test_data::*;
