//! Static description of the menu: nodes, levels and transitions.
//!
//! The menu is a state machine defined by data. Each node is a state, edges
//! define which button moves from one node to another, and levels group
//! nodes that are shown together and browsed with UP and DOWN. The whole
//! table is validated once when the graph is built, so the navigation never
//! needs to handle a malformed table at runtime.

pub mod table;

use heapless::FnvIndexSet;

use crate::field::Field;
use crate::input::Button;
use crate::peripherals::{
    Activity, Group, OptionId, Operation, ParameterId, Parameters, MODE_MANUAL,
};

/// Upper limit of nodes a table may declare.
pub const MAX_NODES: usize = 32;

/// Longest option label that fits next to the icon.
pub const MAX_CHOICE_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(pub u8);

/// A single state of the menu.
///
/// Empty label means the text is computed when drawn. For value rows, the
/// first character of the label is used as the icon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Node {
    pub id: NodeId,
    pub label: &'static str,
    pub kind: Kind,
    pub lock: Lock,
}

/// Behavior bound to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Kind {
    /// Opens a child level on OK.
    Navigation,
    /// Live number edited digit by digit.
    Numeric(NumericField),
    /// Live number that is only displayed.
    Readout(Readout),
    /// Choice among named options.
    Toggle(Toggle),
    /// Starts or stops a background operation.
    Action(Operation),
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NumericField {
    pub parameter: ParameterId,
    pub decimals: u8,
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readout {
    pub parameter: ParameterId,
    pub decimals: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Toggle {
    pub option: OptionId,
    pub choices: &'static [&'static str],
}

/// Condition under which a node refuses editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lock {
    Free,
    /// Locked while autotuning.
    Tuning,
    /// Locked while a profile runs.
    Profile,
    /// Editable only in manual mode and while not autotuning.
    Manual,
}

/// Button `input` pressed on node `from` moves to node `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edge {
    pub from: NodeId,
    pub input: Button,
    pub to: NodeId,
}

/// Ordered nodes browsed together, the first level is the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Level {
    pub items: &'static [NodeId],
    pub group: Option<Group>,
}

/// Defects of a menu table found during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    NoLevels,
    TooManyNodes,
    EmptyLevel(usize),
    DuplicateNode(NodeId),
    UnknownNode(NodeId),
    /// Node is in no level, or in more than one.
    Misplaced(NodeId),
    NoneTrigger(NodeId),
    /// Node has no valid BACK edge.
    Stranded(NodeId),
    /// Navigation node has no OK edge to the first item of another level.
    DanglingNavigation(NodeId),
    Unreachable(NodeId),
    InvalidField(NodeId),
}

/// Validated menu table.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuGraph {
    nodes: &'static [Node],
    edges: &'static [Edge],
    levels: &'static [Level],
}

impl Node {
    pub fn is_editable(&self) -> bool {
        matches!(self.kind, Kind::Numeric(_) | Kind::Toggle(_))
    }

    /// Whether editing is refused right now.
    pub fn is_locked(&self, activity: Activity, parameters: &impl Parameters) -> bool {
        match self.lock {
            Lock::Free => false,
            Lock::Tuning => activity.runs(Operation::Autotune),
            Lock::Profile => activity.runs(Operation::Profile),
            Lock::Manual => {
                activity.runs(Operation::Autotune)
                    || parameters.option(OptionId::Mode) != MODE_MANUAL
            }
        }
    }

    /// Whether the node is controlled or triggered by the operation.
    pub fn belongs_to(&self, operation: Operation) -> bool {
        if let Kind::Action(action) = self.kind {
            return action == operation;
        }
        matches!(
            (self.lock, operation),
            (Lock::Tuning | Lock::Manual, Operation::Autotune)
                | (Lock::Profile, Operation::Profile)
        )
    }

    fn has_valid_field(&self) -> bool {
        match self.kind {
            Kind::Numeric(numeric) => {
                let field = Field::new(numeric.decimals);
                field.decimals() == numeric.decimals
                    && numeric.min <= numeric.max
                    && field.fits(numeric.min)
                    && field.fits(numeric.max)
            }
            Kind::Readout(readout) => Field::new(readout.decimals).decimals() == readout.decimals,
            Kind::Toggle(toggle) => {
                !toggle.choices.is_empty()
                    && toggle
                        .choices
                        .iter()
                        .all(|c| c.is_ascii() && c.len() <= MAX_CHOICE_LEN)
            }
            Kind::Navigation | Kind::Action(_) => true,
        }
    }
}

impl MenuGraph {
    /// Build the graph after checking the table is sound.
    ///
    /// # Errors
    ///
    /// Returns the first `TableError` found. Every node must sit in exactly
    /// one level, have a BACK edge leading to its parent (or to itself on
    /// the root level), and be reachable from the root. Navigation nodes
    /// must lead to the first item of another level and numeric fields
    /// must fit their bounds.
    pub fn new(
        nodes: &'static [Node],
        edges: &'static [Edge],
        levels: &'static [Level],
    ) -> Result<Self, TableError> {
        let graph = Self {
            nodes,
            edges,
            levels,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Follow the first edge matching the node and button.
    ///
    /// Without a matching edge the node stays unchanged.
    pub fn transition(&self, from: NodeId, input: Button) -> NodeId {
        self.edges
            .iter()
            .find(|edge| edge.from == from && edge.input == input)
            .map_or(from, |edge| edge.to)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Item of the given level at the given index.
    pub fn item(&self, level: usize, index: usize) -> Option<&Node> {
        let id = *self.level(level)?.items.get(index)?;
        self.node(id)
    }

    /// Level index and index within the level of the node.
    pub fn locate(&self, id: NodeId) -> Option<(usize, usize)> {
        self.levels.iter().enumerate().find_map(|(level, l)| {
            l.items
                .iter()
                .position(|item| *item == id)
                .map(|index| (level, index))
        })
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.levels.is_empty() {
            return Err(TableError::NoLevels);
        }
        if self.nodes.len() > MAX_NODES {
            return Err(TableError::TooManyNodes);
        }

        self.validate_nodes()?;
        self.validate_levels()?;
        self.validate_edges()?;
        self.validate_reachability()
    }

    fn validate_nodes(&self) -> Result<(), TableError> {
        let mut seen = FnvIndexSet::<u8, MAX_NODES>::new();
        for node in self.nodes {
            if !seen.insert(node.id.0).map_err(|_| TableError::TooManyNodes)? {
                return Err(TableError::DuplicateNode(node.id));
            }
            if !node.has_valid_field() {
                return Err(TableError::InvalidField(node.id));
            }
        }
        Ok(())
    }

    fn validate_levels(&self) -> Result<(), TableError> {
        for (index, level) in self.levels.iter().enumerate() {
            if level.items.is_empty() {
                return Err(TableError::EmptyLevel(index));
            }
            if let Some(item) = level.items.iter().find(|item| self.node(**item).is_none()) {
                return Err(TableError::UnknownNode(*item));
            }
        }
        for node in self.nodes {
            let occurrences: usize = self
                .levels
                .iter()
                .map(|level| level.items.iter().filter(|item| **item == node.id).count())
                .sum();
            if occurrences != 1 {
                return Err(TableError::Misplaced(node.id));
            }
        }
        Ok(())
    }

    fn validate_edges(&self) -> Result<(), TableError> {
        for edge in self.edges {
            if edge.input.is_none() {
                return Err(TableError::NoneTrigger(edge.from));
            }
            for id in [edge.from, edge.to] {
                if self.node(id).is_none() {
                    return Err(TableError::UnknownNode(id));
                }
            }
        }

        for node in self.nodes {
            if matches!(node.kind, Kind::Navigation) && self.child_level(node.id).is_none() {
                return Err(TableError::DanglingNavigation(node.id));
            }
            if !self.has_way_back(node.id) {
                return Err(TableError::Stranded(node.id));
            }
        }
        Ok(())
    }

    fn validate_reachability(&self) -> Result<(), TableError> {
        let mut reached_levels = FnvIndexSet::<usize, MAX_NODES>::new();
        reached_levels
            .insert(0)
            .map_err(|_| TableError::TooManyNodes)?;

        loop {
            let mut grown = false;
            for node in self.nodes {
                let Some((level, _)) = self.locate(node.id) else {
                    continue;
                };
                if !reached_levels.contains(&level) {
                    continue;
                }
                if let Some(child) = self.child_level(node.id) {
                    grown |= reached_levels
                        .insert(child)
                        .map_err(|_| TableError::TooManyNodes)?;
                }
            }
            if !grown {
                break;
            }
        }

        for node in self.nodes {
            match self.locate(node.id) {
                Some((level, _)) if reached_levels.contains(&level) => (),
                _ => return Err(TableError::Unreachable(node.id)),
            }
        }
        Ok(())
    }

    /// Level opened by a navigation node, if its OK edge is well formed.
    fn child_level(&self, id: NodeId) -> Option<usize> {
        let node = self.node(id)?;
        if !matches!(node.kind, Kind::Navigation) {
            return None;
        }
        let (own_level, _) = self.locate(id)?;
        let target = self.transition(id, Button::Ok);
        match self.locate(target) {
            Some((level, 0)) if level != own_level => Some(level),
            _ => None,
        }
    }

    fn has_way_back(&self, id: NodeId) -> bool {
        let Some(edge) = self
            .edges
            .iter()
            .find(|edge| edge.from == id && edge.input == Button::Back)
        else {
            return false;
        };
        let Some((own_level, _)) = self.locate(id) else {
            return false;
        };
        if own_level == 0 {
            return edge.to == id;
        }
        self.child_level(edge.to) == Some(own_level)
    }
}
