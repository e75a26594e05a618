//! In-memory device for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Device, DeviceError};
use crate::domain::{Color, TouchSample};

/// Replays queued touch samples and records every color
#[derive(Debug, Default)]
pub struct FakeDevice {
    touches: Mutex<VecDeque<TouchSample>>,
    resting: Mutex<TouchSample>,
    colors: Mutex<Vec<Color>>,
    disconnected: AtomicBool,
    released: AtomicBool,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue samples returned by successive polls; once drained the last one repeats
    pub fn queue_touches(&self, samples: impl IntoIterator<Item = TouchSample>) {
        self.touches.lock().unwrap().extend(samples);
    }

    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    pub fn colors(&self) -> Vec<Color> {
        self.colors.lock().unwrap().clone()
    }

    pub fn last_color(&self) -> Option<Color> {
        self.colors.lock().unwrap().last().copied()
    }

    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Device for FakeDevice {
    fn poll_touch(&self) -> Result<TouchSample, DeviceError> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(DeviceError::Disconnected);
        }
        let mut resting = self.resting.lock().unwrap();
        if let Some(sample) = self.touches.lock().unwrap().pop_front() {
            *resting = sample;
        }
        Ok(*resting)
    }

    fn set_color(&self, color: Color) -> Result<(), DeviceError> {
        self.colors.lock().unwrap().push(color);
        Ok(())
    }

    fn release(&self) -> Result<(), DeviceError> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}
