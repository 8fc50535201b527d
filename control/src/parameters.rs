//! Reference implementation of the parameter storage.
//!
//! Values live in RAM, a commit of any group produces a pending save to be
//! written by the firmware once it gets to it.

use crate::log;
use crate::peripherals::{Group, OptionId, ParameterId, Parameters};
use crate::save::Save;

const MODE_CHOICES: usize = 2;
const DIRECTION_CHOICES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterStore {
    setpoint: f32,
    input: f32,
    output: f32,
    kp: f32,
    ki: f32,
    kd: f32,
    mode: usize,
    direction: usize,
    pending: Option<Group>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::from_save(Save::default())
    }
}

impl ParameterStore {
    #[must_use]
    pub fn from_save(save: Save) -> Self {
        Self {
            setpoint: save.setpoint,
            input: f32::NAN,
            output: save.output,
            kp: save.kp,
            ki: save.ki,
            kd: save.kd,
            mode: usize::from(save.mode) % MODE_CHOICES,
            direction: usize::from(save.direction) % DIRECTION_CHOICES,
            pending: None,
        }
    }

    pub fn save(&self) -> Save {
        Save {
            setpoint: self.setpoint,
            output: self.output,
            mode: self.mode as u8,
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            direction: self.direction as u8,
        }
    }

    /// Update the measured input. Not a number marks a failed sensor.
    pub fn set_input(&mut self, input: f32) {
        self.input = input;
    }

    /// Return the save requested by the last commit, if not taken yet.
    pub fn take_save(&mut self) -> Option<Save> {
        self.pending.take().map(|_| self.save())
    }
}

impl Parameters for ParameterStore {
    fn value(&self, parameter: ParameterId) -> f32 {
        match parameter {
            ParameterId::Setpoint => self.setpoint,
            ParameterId::Input => self.input,
            ParameterId::Output => self.output,
            ParameterId::Kp => self.kp,
            ParameterId::Ki => self.ki,
            ParameterId::Kd => self.kd,
        }
    }

    fn set_value(&mut self, parameter: ParameterId, value: f32) {
        let slot = match parameter {
            ParameterId::Setpoint => &mut self.setpoint,
            ParameterId::Input => &mut self.input,
            ParameterId::Output => &mut self.output,
            ParameterId::Kp => &mut self.kp,
            ParameterId::Ki => &mut self.ki,
            ParameterId::Kd => &mut self.kd,
        };
        *slot = value;
    }

    fn option(&self, option: OptionId) -> usize {
        match option {
            OptionId::Mode => self.mode,
            OptionId::Direction => self.direction,
        }
    }

    fn set_option(&mut self, option: OptionId, index: usize) {
        match option {
            OptionId::Mode => self.mode = index % MODE_CHOICES,
            OptionId::Direction => self.direction = index % DIRECTION_CHOICES,
        }
    }

    fn commit(&mut self, group: Group) {
        log::info!("Requesting save of group={}", group);
        self.pending = Some(group);
    }
}
