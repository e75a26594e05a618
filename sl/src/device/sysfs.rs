//! Linux binding for the controller: multicolor LED class + evdev touchpad

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::config::DeviceConfig;
use super::{Device, DeviceError};
use crate::domain::{Color, TouchSample};

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;
const SYN_REPORT: u16 = 0x00;
const BTN_TOUCH: u16 = 0x14a;
const ABS_X: u16 = 0x00;

/// Size of `struct timeval` at the head of every `struct input_event`
const TIMEVAL_SIZE: usize = std::mem::size_of::<nix::libc::timeval>();

/// Size of one `struct input_event` as read from an evdev node
pub const INPUT_EVENT_SIZE: usize = TIMEVAL_SIZE + 8;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DeviceError + '_ {
    move |source| DeviceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Controller bound through sysfs and evdev
pub struct SysfsDevice {
    led: LightBar,
    touch: TouchReader,
}

impl SysfsDevice {
    /// Discover the light bar and touchpad and start reading touch events
    pub fn discover(config: &DeviceConfig) -> Result<Self, DeviceError> {
        debug!(?config, "SysfsDevice::discover: called");
        let led_dir = match &config.led_path {
            Some(path) => path.clone(),
            None => find_led_dir(&config.leds_root, &config.led_suffix)?,
        };
        let touch_node = match &config.touch_path {
            Some(path) => path.clone(),
            None => find_touch_node(&config.input_root, &config.touchpad_name)?,
        };

        let led = LightBar::open(&led_dir)?;
        let touch = TouchReader::open(&touch_node)?;
        info!(led = %led_dir.display(), touch = %touch_node.display(), "Controller discovered");

        Ok(Self { led, touch })
    }

    /// Directory of the light bar LED
    pub fn led_dir(&self) -> &Path {
        &self.led.dir
    }
}

impl Device for SysfsDevice {
    fn poll_touch(&self) -> Result<TouchSample, DeviceError> {
        self.touch.latest()
    }

    fn set_color(&self, color: Color) -> Result<(), DeviceError> {
        self.led.set(color)
    }

    fn release(&self) -> Result<(), DeviceError> {
        debug!("SysfsDevice::release: called");
        self.touch.stop();
        Ok(())
    }
}

/// Find the LED class entry whose name ends with `suffix`
pub fn find_led_dir(leds_root: &Path, suffix: &str) -> Result<PathBuf, DeviceError> {
    let entries = fs::read_dir(leds_root).map_err(io_error(leds_root))?;
    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(suffix))
        .map(|entry| entry.path())
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(DeviceError::NotFound(format!(
            "no LED matching '*{}' under {}",
            suffix,
            leds_root.display()
        ))),
        1 => Ok(matches.remove(0)),
        n => {
            warn!(count = n, "Multiple light bars found, using the first");
            Ok(matches.remove(0))
        }
    }
}

/// Find the `/dev/input/eventN` node whose input device is named `name`
pub fn find_touch_node(input_root: &Path, name: &str) -> Result<PathBuf, DeviceError> {
    let entries = fs::read_dir(input_root).map_err(io_error(input_root))?;
    let mut events: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|file_name| file_name.starts_with("event"))
        .collect();
    events.sort();

    for event in events {
        let name_path = input_root.join(&event).join("device").join("name");
        let Ok(device_name) = fs::read_to_string(&name_path) else {
            continue;
        };
        if device_name.trim() == name {
            return Ok(PathBuf::from("/dev/input").join(event));
        }
    }

    Err(DeviceError::NotFound(format!(
        "no input device named '{}' under {}",
        name,
        input_root.display()
    )))
}

/// Light bar driven through `multi_intensity` and `brightness`
struct LightBar {
    dir: PathBuf,
    /// Position of red, green and blue in `multi_intensity`
    channel_order: [usize; 3],
    max_brightness: String,
    writes: Mutex<()>,
}

impl LightBar {
    fn open(dir: &Path) -> Result<Self, DeviceError> {
        let max_path = dir.join("max_brightness");
        let max_brightness = fs::read_to_string(&max_path)
            .map_err(io_error(&max_path))?
            .trim()
            .to_string();

        // multi_index lists the channel names in the order multi_intensity expects
        let index_path = dir.join("multi_index");
        let channel_order = match fs::read_to_string(&index_path) {
            Ok(index) => parse_channel_order(&index),
            Err(e) => {
                debug!(error = %e, "LightBar::open: no multi_index, assuming red green blue");
                [0, 1, 2]
            }
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            channel_order,
            max_brightness,
            writes: Mutex::new(()),
        })
    }

    fn set(&self, color: Color) -> Result<(), DeviceError> {
        let mut intensity = [0u8; 3];
        for (slot, value) in self.channel_order.iter().zip([color.r, color.g, color.b]) {
            intensity[*slot] = value;
        }
        let line = format!("{} {} {}", intensity[0], intensity[1], intensity[2]);

        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let intensity_path = self.dir.join("multi_intensity");
        fs::write(&intensity_path, line).map_err(io_error(&intensity_path))?;
        let brightness_path = self.dir.join("brightness");
        fs::write(&brightness_path, &self.max_brightness).map_err(io_error(&brightness_path))?;
        Ok(())
    }
}

fn parse_channel_order(index: &str) -> [usize; 3] {
    let names: Vec<&str> = index.split_whitespace().collect();
    let position = |channel: &str, fallback: usize| names.iter().position(|n| *n == channel).unwrap_or(fallback);
    let order = [position("red", 0), position("green", 1), position("blue", 2)];
    if order.iter().all(|&p| p < 3) { order } else { [0, 1, 2] }
}

/// Folds raw evdev events into touch samples, one per `SYN_REPORT`
#[derive(Debug, Default)]
pub struct TouchDecoder {
    pending: TouchSample,
}

impl TouchDecoder {
    /// Feed one event; returns the frame's sample when the frame completes
    pub fn feed(&mut self, kind: u16, code: u16, value: i32) -> Option<TouchSample> {
        match (kind, code) {
            (EV_KEY, BTN_TOUCH) => self.pending.active = value != 0,
            (EV_ABS, ABS_X) => self.pending.x = value,
            (EV_SYN, SYN_REPORT) => return Some(self.pending),
            _ => {}
        }
        None
    }

    /// Split a raw `struct input_event` into `(type, code, value)`
    pub fn parse(buf: &[u8; INPUT_EVENT_SIZE]) -> (u16, u16, i32) {
        let kind = u16::from_ne_bytes([buf[TIMEVAL_SIZE], buf[TIMEVAL_SIZE + 1]]);
        let code = u16::from_ne_bytes([buf[TIMEVAL_SIZE + 2], buf[TIMEVAL_SIZE + 3]]);
        let value = i32::from_ne_bytes([
            buf[TIMEVAL_SIZE + 4],
            buf[TIMEVAL_SIZE + 5],
            buf[TIMEVAL_SIZE + 6],
            buf[TIMEVAL_SIZE + 7],
        ]);
        (kind, code, value)
    }
}

/// Background reader that keeps the latest touch sample
///
/// evdev reads block, so the reader runs on its own OS thread and is left
/// detached on shutdown.
pub struct TouchReader {
    latest: Arc<Mutex<TouchSample>>,
    connected: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl TouchReader {
    fn open(node: &Path) -> Result<Self, DeviceError> {
        let file = File::open(node).map_err(io_error(node))?;
        Self::spawn(file, node.display().to_string())
    }

    /// Start reading events from any byte source
    pub fn spawn<R: Read + Send + 'static>(mut source: R, label: String) -> Result<Self, DeviceError> {
        let latest = Arc::new(Mutex::new(TouchSample::released()));
        let connected = Arc::new(AtomicBool::new(true));
        let stopped = Arc::new(AtomicBool::new(false));

        let thread_latest = Arc::clone(&latest);
        let thread_connected = Arc::clone(&connected);
        let thread_stopped = Arc::clone(&stopped);
        std::thread::Builder::new()
            .name("touch-reader".to_string())
            .spawn(move || {
                let mut decoder = TouchDecoder::default();
                let mut buf = [0u8; INPUT_EVENT_SIZE];
                while !thread_stopped.load(Ordering::Relaxed) {
                    if let Err(e) = source.read_exact(&mut buf) {
                        if e.kind() == ErrorKind::Interrupted {
                            continue;
                        }
                        warn!(source = %label, error = %e, "Touch reader stopped");
                        break;
                    }
                    let (kind, code, value) = TouchDecoder::parse(&buf);
                    if let Some(sample) = decoder.feed(kind, code, value) {
                        *thread_latest.lock().unwrap_or_else(PoisonError::into_inner) = sample;
                    }
                }
                thread_connected.store(false, Ordering::Relaxed);
            })
            .map_err(|source| DeviceError::Io {
                path: PathBuf::from("touch-reader"),
                source,
            })?;

        Ok(Self {
            latest,
            connected,
            stopped,
        })
    }

    /// Latest published sample, or `Disconnected` once the source has failed
    pub fn latest(&self) -> Result<TouchSample, DeviceError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(DeviceError::Disconnected);
        }
        Ok(*self.latest.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}
