//! Domain types shared by the gesture, probe and flash loops

mod color;
mod touch;

pub use color::Color;
pub use touch::{Swipe, TouchSample};
