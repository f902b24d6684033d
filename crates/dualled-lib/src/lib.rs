//! dualled — priority arbitration of logical lights onto a shared red/green
//! LED, plus a backlight scaled to the panel's maximum brightness.

pub mod config;
pub mod controller;
pub mod error;
pub mod led;
pub mod light;
pub mod sink;

pub use controller::Lights;
pub use error::DualledError;
pub use light::{FlashMode, LightId, LightState, Slot};
