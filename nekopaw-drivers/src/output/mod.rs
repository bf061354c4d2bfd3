//! Output adapters

pub mod gpio;

pub use gpio::GpioOutput;
