//! Menu of the temperature controller.
//!
//! ```text
//! root            dashboard       config
//!
//! DashBrd  ---->  S setpoint
//! Config   -------------------->  P gain
//! ATune           I input         I gain
//! Profile         O output        D gain
//!                 M mode          A action
//! ```

use super::{
    Edge, Kind, Level, Lock, MenuGraph, Node, NodeId, NumericField, Readout, TableError, Toggle,
};
use crate::input::Button;
use crate::peripherals::{Group, OptionId, Operation, ParameterId};

pub const DASHBOARD: NodeId = NodeId(1);
pub const CONFIG: NodeId = NodeId(2);
pub const AUTOTUNE: NodeId = NodeId(3);
pub const PROFILE: NodeId = NodeId(4);
pub const SETPOINT: NodeId = NodeId(5);
pub const INPUT: NodeId = NodeId(6);
pub const OUTPUT: NodeId = NodeId(7);
pub const MODE: NodeId = NodeId(8);
pub const KP: NodeId = NodeId(9);
pub const KI: NodeId = NodeId(10);
pub const KD: NodeId = NodeId(11);
pub const DIRECTION: NodeId = NodeId(12);

const fn gain(id: NodeId, label: &'static str, parameter: ParameterId) -> Node {
    Node {
        id,
        label,
        kind: Kind::Numeric(NumericField {
            parameter,
            decimals: 2,
            min: 0.0,
            max: 99.99,
        }),
        lock: Lock::Tuning,
    }
}

pub const NODES: &[Node] = &[
    Node {
        id: DASHBOARD,
        label: "DashBrd",
        kind: Kind::Navigation,
        lock: Lock::Free,
    },
    Node {
        id: CONFIG,
        label: "Config",
        kind: Kind::Navigation,
        lock: Lock::Free,
    },
    Node {
        id: AUTOTUNE,
        label: "",
        kind: Kind::Action(Operation::Autotune),
        lock: Lock::Free,
    },
    Node {
        id: PROFILE,
        label: "",
        kind: Kind::Action(Operation::Profile),
        lock: Lock::Free,
    },
    Node {
        id: SETPOINT,
        label: "S",
        kind: Kind::Numeric(NumericField {
            parameter: ParameterId::Setpoint,
            decimals: 1,
            min: -999.9,
            max: 9999.9,
        }),
        lock: Lock::Profile,
    },
    Node {
        id: INPUT,
        label: "I",
        kind: Kind::Readout(Readout {
            parameter: ParameterId::Input,
            decimals: 1,
        }),
        lock: Lock::Free,
    },
    Node {
        id: OUTPUT,
        label: "O",
        kind: Kind::Numeric(NumericField {
            parameter: ParameterId::Output,
            decimals: 1,
            min: 0.0,
            max: 100.0,
        }),
        lock: Lock::Manual,
    },
    Node {
        id: MODE,
        label: "M",
        kind: Kind::Toggle(Toggle {
            option: OptionId::Mode,
            choices: &["Man", "Auto"],
        }),
        lock: Lock::Tuning,
    },
    gain(KP, "P", ParameterId::Kp),
    gain(KI, "I", ParameterId::Ki),
    gain(KD, "D", ParameterId::Kd),
    Node {
        id: DIRECTION,
        label: "A",
        kind: Kind::Toggle(Toggle {
            option: OptionId::Direction,
            choices: &["Direc", "Rever"],
        }),
        lock: Lock::Tuning,
    },
];

pub const LEVELS: &[Level] = &[
    Level {
        items: &[DASHBOARD, CONFIG, AUTOTUNE, PROFILE],
        group: None,
    },
    Level {
        items: &[SETPOINT, INPUT, OUTPUT, MODE],
        group: Some(Group::Dashboard),
    },
    Level {
        items: &[KP, KI, KD, DIRECTION],
        group: Some(Group::Tunings),
    },
];

const fn edge(from: NodeId, input: Button, to: NodeId) -> Edge {
    Edge { from, input, to }
}

pub const EDGES: &[Edge] = &[
    edge(DASHBOARD, Button::Back, DASHBOARD),
    edge(DASHBOARD, Button::Ok, SETPOINT),
    edge(CONFIG, Button::Back, CONFIG),
    edge(CONFIG, Button::Ok, KP),
    edge(AUTOTUNE, Button::Back, AUTOTUNE),
    edge(PROFILE, Button::Back, PROFILE),

    edge(SETPOINT, Button::Back, DASHBOARD),
    edge(INPUT, Button::Back, DASHBOARD),
    edge(OUTPUT, Button::Back, DASHBOARD),
    edge(MODE, Button::Back, DASHBOARD),

    edge(KP, Button::Back, CONFIG),
    edge(KI, Button::Back, CONFIG),
    edge(KD, Button::Back, CONFIG),
    edge(DIRECTION, Button::Back, CONFIG),
];

impl MenuGraph {
    /// The controller's menu.
    ///
    /// # Errors
    ///
    /// Fails only if the static table is malformed, which is covered by
    /// tests.
    pub fn controller() -> Result<Self, TableError> {
        Self::new(NODES, EDGES, LEVELS)
    }
}
