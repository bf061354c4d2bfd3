//! Bridge controller and API handler

pub mod api;
pub mod controller;

pub use controller::BridgeController;
