//! Output command routing

pub mod dispatcher;

pub use dispatcher::OutputDispatcher;
