use strum::{EnumIter, FromRepr, VariantArray};

use crate::env::DiscreteAction;

/// Cell coordinates, `x` growing east and `z` growing north
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub x: i32,
    pub z: i32,
}

impl Pos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    pub const fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

/// Which wrong goal the agent has already stepped on during the current episode
///
/// Only single-goal reward modes ever set this; it lets the value function tell
/// "haven't ruled anything out" apart from "know which goal is live".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, EnumIter)]
pub enum Knowledge {
    #[default]
    None,
    VisitedA,
    VisitedB,
}

/// Position plus episode knowledge; the key of the action-value table
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct State {
    pub pos: Pos,
    pub knows: Knowledge,
}

impl State {
    pub const fn new(pos: Pos, knows: Knowledge) -> Self {
        Self { pos, knows }
    }

    pub const fn at(x: i32, z: i32) -> Self {
        Self {
            pos: Pos::new(x, z),
            knows: Knowledge::None,
        }
    }
}

/// Compass moves, indexed in table order
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, VariantArray, FromRepr)]
pub enum Action {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Action {
    /// Unit step of the intended move
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::North => (0, 1),
            Action::East => (1, 0),
            Action::South => (0, -1),
            Action::West => (-1, 0),
        }
    }

    /// Unit step along the axis perpendicular to the move, used for slipping
    pub const fn lateral(self) -> (i32, i32) {
        match self {
            Action::North | Action::South => (1, 0),
            Action::East | Action::West => (0, 1),
        }
    }

    pub const fn arrow(self) -> char {
        match self {
            Action::North => '↑',
            Action::East => '→',
            Action::South => '↓',
            Action::West => '←',
        }
    }
}

impl DiscreteAction for Action {
    const COUNT: usize = Action::VARIANTS.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(ix: usize) -> Option<Self> {
        Action::from_repr(ix)
    }
}
