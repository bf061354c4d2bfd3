//! NekoPaw Bridge API protocol
//!
//! This crate defines the contract between the bridge runtime and the network
//! transport that carries agent requests to it. The transport (an HTTP server
//! on the device) is not part of this workspace: it parses the request line,
//! hands method, target and body to the runtime, and writes back the status
//! and JSON body it receives.
//!
//! # Protocol Overview
//!
//! All routes live under [`API_PREFIX`]:
//! ```text
//! GET  /api/bridge/device                   device info and counters
//! GET  /api/bridge/capabilities             registered capabilities
//! GET  /api/bridge/sensors[/{id}]           sensor readings
//! POST /api/bridge/outputs/{id}             output command (JSON object)
//! GET  /api/bridge/display                  display session snapshot
//! POST /api/bridge/display/text             text content (JSON)
//! POST /api/bridge/display/bitmap           raw bitmap bytes
//! POST /api/bridge/display/confirm          confirmation prompt (JSON)
//! GET  /api/bridge/display/confirm/{ticket} confirmation status
//! POST /api/bridge/display/confirm/resolve  resolve pending confirmation
//! POST /api/bridge/display/clear            clear the panel
//! GET  /api/bridge/events                   drain queued input events
//! ```
//!
//! Every response body is JSON: `{"ok":true,"result":...}` on success and
//! `{"ok":false,"error":<kind>,"message":...}` on failure.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod error;
pub mod events;
pub mod messages;
pub mod reports;
pub mod route;

pub use error::ErrorKind;
pub use events::EventKind;
pub use messages::{
    parse_json, ApiRequest, ApiResponse, BitmapQuery, Category, CommandParams, ConfirmRequest,
    ConfirmStatus, RefreshMode, ResolveRequest, SessionState, TextRequest, TextStyle,
};
pub use route::{Method, Route, API_PREFIX};
