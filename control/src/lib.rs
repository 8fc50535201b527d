//! Front panel of a PID temperature controller: an analog keypad, a menu
//! of values and options, and a two row character display.
//!
//! It is targetted to run in a firmware that polls it from its main loop,
//! next to the control loop owning the parameters. All hardware is reached
//! through the traits in `peripherals`, so the whole panel can be exercised
//! in software too.
//!
//! Following is the flow of a single poll:
//!
//! ```text
//!   [ Keypad ADC ]         [ Clock ]
//!          |                   |
//!          V                   V
//!   [ Debouncer {Thresholds} ] -------+
//!          |                          |
//!          | (Button)                 | (now)
//!          V                          |
//!   [ Controller {MenuGraph} ] <---> {Parameters} ---> (Save) ---> {Store}
//!          |        A                 |
//!          |        +--------------> {Background}
//!          V                          |
//!   [ Renderer ] <--------------------+
//!          |
//!          | (Frame)
//!          V
//!   [ Character display ]
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod editor;
pub mod field;
pub mod input;
mod log;
pub mod menu;
pub mod navigation;
pub mod panel;
pub mod parameters;
pub mod peripherals;
pub mod render;
pub mod save;

#[cfg(test)]
mod testlib;

pub use crate::input::{Button, ButtonCalibration, Debouncer, Thresholds};
pub use crate::menu::{MenuGraph, TableError};
pub use crate::navigation::Controller;
pub use crate::panel::Panel;
pub use crate::parameters::ParameterStore;
pub use crate::render::Frame;
pub use crate::save::{InvalidData, Save, Store};
