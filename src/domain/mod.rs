/// Domain types shared by the simulation and the UI.

pub mod element;

/// A grid coordinate pair. Doubles as the payload of a radar sighting:
/// the player's position at the moment an enemy was notified.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

/// Movement direction for a player step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    /// Unit (dx, dy) for this direction. Screen coordinates: y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
        }
    }
}

/// Discrete input event produced by the blocking reader thread.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Quit,
    Interact,
    Move(MoveDir),
}
