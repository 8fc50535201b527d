//! The front panel as a whole, driven by one cooperative loop.

use crate::input::{Button, Debouncer, Thresholds};
use crate::menu::MenuGraph;
use crate::navigation::Controller;
use crate::peripherals::{AnalogInput, Background, CharacterDisplay, Clock, Parameters};
use crate::render::Frame;

/// Keypad, menu and display glued together.
///
/// Each call to `poll` samples the keypad once, dispatches at most one
/// debounced press and redraws the display. It never blocks, all timing
/// is derived from the clock reading taken at the start of the poll.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Panel {
    debouncer: Debouncer,
    controller: Controller,
}

/// Response of the panel after processing a single reading.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UpdateResult {
    pub button: Button,
    pub frame: Frame,
}

impl Panel {
    #[must_use]
    pub fn new(graph: MenuGraph, thresholds: Thresholds) -> Self {
        Self {
            debouncer: Debouncer::new(thresholds),
            controller: Controller::new(graph),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Process one raw keypad reading taken at `now` milliseconds.
    pub fn update(
        &mut self,
        reading: u16,
        now: u32,
        parameters: &mut impl Parameters,
        background: &mut impl Background,
    ) -> UpdateResult {
        let button = self.debouncer.sample(reading, now);
        if !button.is_none() {
            self.controller.apply(button, parameters, background);
        }
        let frame = self.controller.draw(&*parameters, &*background, now);
        UpdateResult { button, frame }
    }

    /// Run one iteration of the panel loop against the peripherals.
    ///
    /// Returns the button dispatched during this iteration, if any.
    pub fn poll(
        &mut self,
        keypad: &mut impl AnalogInput,
        clock: &impl Clock,
        display: &mut impl CharacterDisplay,
        parameters: &mut impl Parameters,
        background: &mut impl Background,
    ) -> Button {
        let now = clock.now();
        let reading = keypad.read();
        let result = self.update(reading, now, parameters, background);
        result.frame.flush(display);
        result.button
    }
}
