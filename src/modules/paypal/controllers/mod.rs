pub mod process_controller;

pub use process_controller::configure;
