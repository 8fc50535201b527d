//! Services the front panel consumes from the rest of the controller.
//!
//! The keypad ADC, the character LCD, the parameter storage and the
//! background tasks (autotune, profiles) live in the firmware. This module
//! only describes what the panel needs from them.

/// Single channel ADC the keypad ladder is connected to.
pub trait AnalogInput {
    fn read(&mut self) -> u16;
}

/// Monotonic millisecond clock. It is allowed to wrap around.
pub trait Clock {
    fn now(&self) -> u32;
}

/// Character LCD with a hardware text cursor.
pub trait CharacterDisplay {
    fn set_cursor(&mut self, column: u8, row: u8);
    fn write_str(&mut self, text: &str);
    fn show_cursor(&mut self);
    fn hide_cursor(&mut self);
}

/// Live parameters of the controller, owned by the control loop.
pub trait Parameters {
    fn value(&self, parameter: ParameterId) -> f32;
    fn set_value(&mut self, parameter: ParameterId, value: f32);
    fn option(&self, option: OptionId) -> usize;
    fn set_option(&mut self, option: OptionId, index: usize);

    /// Persist the given group, called once after a level with edits is left.
    fn commit(&mut self, group: Group);
}

/// Long running operations advanced outside of the panel.
pub trait Background {
    fn activity(&self) -> Activity;
    fn profile_name(&self) -> &str;
    fn start(&mut self, operation: Operation);
    fn stop(&mut self, operation: Operation);
}

/// Numeric parameters the menu can show or edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterId {
    Setpoint,
    Input,
    Output,
    Kp,
    Ki,
    Kd,
}

/// Enumerated parameters, stored as an index into their choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OptionId {
    Mode,
    Direction,
}

/// Index of manual mode among `OptionId::Mode` choices.
pub const MODE_MANUAL: usize = 0;

/// Parameters persisted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Group {
    Dashboard,
    Tunings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    Autotune,
    Profile,
}

/// What the background is busy with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    #[default]
    Idle,
    Tuning,
    Profile {
        step: u8,
    },
}

impl Activity {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn runs(&self, operation: Operation) -> bool {
        matches!(
            (self, operation),
            (Self::Tuning, Operation::Autotune) | (Self::Profile { .. }, Operation::Profile)
        )
    }
}
