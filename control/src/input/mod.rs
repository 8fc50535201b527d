//! Keypad sensing: classification of the analog line and debouncing.

pub mod button;
pub mod calibration;
pub mod debouncer;

pub use button::Button;
pub use calibration::{ButtonCalibration, Thresholds};
pub use debouncer::Debouncer;
