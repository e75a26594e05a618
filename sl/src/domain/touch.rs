//! Touch samples and the swipes derived from them

use std::fmt;

/// One reading of the touch surface, taken once per gesture tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchSample {
    /// Whether a finger is on the surface
    pub active: bool,
    /// Horizontal position of the first contact
    pub x: i32,
}

impl TouchSample {
    pub fn touching(x: i32) -> Self {
        Self { active: true, x }
    }

    pub fn released() -> Self {
        Self::default()
    }
}

/// Direction of a detected swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

impl Swipe {
    /// Name of the mode the swipe selects
    pub fn mode(&self) -> &'static str {
        match self {
            Swipe::Left => "Stealth",
            Swipe::Right => "Alert",
        }
    }
}

impl fmt::Display for Swipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Swipe::Left => write!(f, "left"),
            Swipe::Right => write!(f, "right"),
        }
    }
}
