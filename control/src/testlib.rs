//! Stand-ins for the firmware services, used across unit tests.

use crate::peripherals::{
    Activity, Background, CharacterDisplay, Group, OptionId, Operation, ParameterId, Parameters,
};

/// In-memory parameters recording every commit.
#[derive(Debug, Default)]
pub struct FakeParameters {
    pub values: [f32; 6],
    pub options: [usize; 2],
    pub commits: Vec<Group>,
}

fn value_index(parameter: ParameterId) -> usize {
    match parameter {
        ParameterId::Setpoint => 0,
        ParameterId::Input => 1,
        ParameterId::Output => 2,
        ParameterId::Kp => 3,
        ParameterId::Ki => 4,
        ParameterId::Kd => 5,
    }
}

fn option_index(option: OptionId) -> usize {
    match option {
        OptionId::Mode => 0,
        OptionId::Direction => 1,
    }
}

impl Parameters for FakeParameters {
    fn value(&self, parameter: ParameterId) -> f32 {
        self.values[value_index(parameter)]
    }

    fn set_value(&mut self, parameter: ParameterId, value: f32) {
        self.values[value_index(parameter)] = value;
    }

    fn option(&self, option: OptionId) -> usize {
        self.options[option_index(option)]
    }

    fn set_option(&mut self, option: OptionId, index: usize) {
        self.options[option_index(option)] = index;
    }

    fn commit(&mut self, group: Group) {
        self.commits.push(group);
    }
}

/// Background whose activity is set directly by the test.
#[derive(Debug)]
pub struct FakeBackground {
    pub activity: Activity,
    pub profile_name: &'static str,
    pub requests: Vec<(Operation, bool)>,
}

impl Default for FakeBackground {
    fn default() -> Self {
        Self {
            activity: Activity::Idle,
            profile_name: "No Prof",
            requests: Vec::new(),
        }
    }
}

impl Background for FakeBackground {
    fn activity(&self) -> Activity {
        self.activity
    }

    fn profile_name(&self) -> &str {
        self.profile_name
    }

    fn start(&mut self, operation: Operation) {
        self.requests.push((operation, true));
    }

    fn stop(&mut self, operation: Operation) {
        self.requests.push((operation, false));
    }
}

/// Character grid remembering what was written where.
#[derive(Debug)]
pub struct FakeDisplay {
    pub grid: [[char; 8]; 2],
    pub position: (u8, u8),
    pub cursor_visible: bool,
}

impl Default for FakeDisplay {
    fn default() -> Self {
        Self {
            grid: [[' '; 8]; 2],
            position: (0, 0),
            cursor_visible: false,
        }
    }
}

impl FakeDisplay {
    pub fn row(&self, row: usize) -> String {
        self.grid[row].iter().collect()
    }
}

impl CharacterDisplay for FakeDisplay {
    fn set_cursor(&mut self, column: u8, row: u8) {
        self.position = (column, row);
    }

    fn write_str(&mut self, text: &str) {
        for c in text.chars() {
            let (column, row) = self.position;
            if let Some(cell) = self
                .grid
                .get_mut(row as usize)
                .and_then(|r| r.get_mut(column as usize))
            {
                *cell = c;
            }
            self.position = (column + 1, row);
        }
    }

    fn show_cursor(&mut self) {
        self.cursor_visible = true;
    }

    fn hide_cursor(&mut self) {
        self.cursor_visible = false;
    }
}
