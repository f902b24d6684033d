//! Control-surface output — the `Sink` trait, the sysfs backend, and the
//! four-channel shared LED surface.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

// ── Channels ──

/// One of the four channels of the shared red/green LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedChannel {
    Red,
    Green,
    RedBlink,
    GreenBlink,
}

impl LedChannel {
    pub const ALL: [LedChannel; 4] = [
        LedChannel::Red,
        LedChannel::Green,
        LedChannel::RedBlink,
        LedChannel::GreenBlink,
    ];
}

impl fmt::Display for LedChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedChannel::Red => write!(f, "red"),
            LedChannel::Green => write!(f, "green"),
            LedChannel::RedBlink => write!(f, "red blink"),
            LedChannel::GreenBlink => write!(f, "green blink"),
        }
    }
}

/// Any output channel, including the backlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    RedBlink,
    GreenBlink,
    Backlight,
}

impl From<LedChannel> for Channel {
    fn from(c: LedChannel) -> Self {
        match c {
            LedChannel::Red => Channel::Red,
            LedChannel::Green => Channel::Green,
            LedChannel::RedBlink => Channel::RedBlink,
            LedChannel::GreenBlink => Channel::GreenBlink,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::RedBlink => write!(f, "red blink"),
            Channel::GreenBlink => write!(f, "green blink"),
            Channel::Backlight => write!(f, "backlight"),
        }
    }
}

// ── Error type ──

/// Control channel errors.
///
/// `detail` follows the convention **"context: details"**, where *context* is
/// usually the control file path.
#[derive(Debug)]
pub enum SinkError {
    Open { channel: Channel, detail: String },
    Write { channel: Channel, detail: String },
}

impl SinkError {
    pub fn channel(&self) -> Channel {
        match self {
            SinkError::Open { channel, .. } | SinkError::Write { channel, .. } => *channel,
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Open { channel, detail } => {
                write!(f, "Failed to open {channel} channel: {detail}")
            }
            SinkError::Write { channel, detail } => {
                write!(f, "Failed to write {channel} channel: {detail}")
            }
        }
    }
}

impl std::error::Error for SinkError {}

pub type Result<T> = std::result::Result<T, SinkError>;

// ── Trait ──

/// A scalar output that applies each written value immediately and keeps it
/// until the next write.
pub trait Sink: Send {
    fn write(&mut self, value: u64) -> Result<()>;
}

// ── sysfs backend ──

/// Default ceiling when no hardware maximum is available.
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;

/// A control file (typically under `/sys/class/leds`) held open for writing.
///
/// Each write emits the decimal value followed by a newline.
#[derive(Debug)]
pub struct SysfsSink {
    channel: Channel,
    path: PathBuf,
    file: File,
}

impl SysfsSink {
    pub fn open(channel: Channel, path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| SinkError::Open {
                channel,
                detail: format!("{}: {e}", path.display()),
            })?;
        Ok(SysfsSink {
            channel,
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for SysfsSink {
    fn write(&mut self, value: u64) -> Result<()> {
        self.file
            .write_all(format!("{value}\n").as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|e| SinkError::Write {
                channel: self.channel,
                detail: format!("{}: {e}", self.path.display()),
            })
    }
}

/// Read the panel's maximum brightness from a `max_brightness` file.
///
/// Falls back to [`DEFAULT_MAX_BRIGHTNESS`] when the file is missing, does
/// not hold a positive integer, or is empty.
pub fn read_max_brightness(path: &Path) -> u32 {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!(
                "could not read {} ({e}), assuming max brightness {DEFAULT_MAX_BRIGHTNESS}",
                path.display()
            );
            return DEFAULT_MAX_BRIGHTNESS;
        }
    };
    match contents.trim().parse::<u32>() {
        Ok(max) if max > 0 => max,
        _ => {
            log::warn!(
                "invalid max brightness {:?} in {}, assuming {DEFAULT_MAX_BRIGHTNESS}",
                contents.trim(),
                path.display()
            );
            DEFAULT_MAX_BRIGHTNESS
        }
    }
}

// ── Shared LED surface ──

/// The four outputs of the shared red/green LED.
#[derive(Debug)]
pub struct LedSurface<S> {
    pub red: S,
    pub green: S,
    pub red_blink: S,
    pub green_blink: S,
}

impl<S: Sink> LedSurface<S> {
    pub fn write(&mut self, channel: LedChannel, value: u64) -> Result<()> {
        let sink = match channel {
            LedChannel::Red => &mut self.red,
            LedChannel::Green => &mut self.green,
            LedChannel::RedBlink => &mut self.red_blink,
            LedChannel::GreenBlink => &mut self.green_blink,
        };
        sink.write(value)
    }
}

impl LedSurface<SysfsSink> {
    pub fn open(red: &Path, green: &Path, red_blink: &Path, green_blink: &Path) -> Result<Self> {
        Ok(LedSurface {
            red: SysfsSink::open(Channel::Red, red)?,
            green: SysfsSink::open(Channel::Green, green)?,
            red_blink: SysfsSink::open(Channel::RedBlink, red_blink)?,
            green_blink: SysfsSink::open(Channel::GreenBlink, green_blink)?,
        })
    }
}

// ── Mock sinks for testing ──

/// In-memory sinks for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex, PoisonError};

    #[derive(Debug, Default)]
    struct BusState {
        writes: Vec<(Channel, u64)>,
        fail: Option<Channel>,
    }

    /// Shared write log for a set of [`MockSink`]s. Records every write
    /// across all channels in order; cloning shares the same log.
    #[derive(Debug, Clone, Default)]
    pub struct MockBus {
        state: Arc<Mutex<BusState>>,
    }

    impl MockBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sink(&self, channel: Channel) -> MockSink {
            MockSink {
                channel,
                bus: self.clone(),
            }
        }

        pub fn led_surface(&self) -> LedSurface<MockSink> {
            LedSurface {
                red: self.sink(Channel::Red),
                green: self.sink(Channel::Green),
                red_blink: self.sink(Channel::RedBlink),
                green_blink: self.sink(Channel::GreenBlink),
            }
        }

        /// All writes so far, oldest first.
        pub fn writes(&self) -> Vec<(Channel, u64)> {
            self.lock().writes.clone()
        }

        /// Most recent value written to `channel`.
        pub fn last(&self, channel: Channel) -> Option<u64> {
            self.lock()
                .writes
                .iter()
                .rev()
                .find(|(c, _)| *c == channel)
                .map(|&(_, v)| v)
        }

        pub fn clear(&self) {
            self.lock().writes.clear();
        }

        /// Make every write to `channel` fail until reset with `None`.
        pub fn fail_channel(&self, channel: Option<Channel>) {
            self.lock().fail = channel;
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, BusState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[derive(Debug)]
    pub struct MockSink {
        channel: Channel,
        bus: MockBus,
    }

    impl Sink for MockSink {
        fn write(&mut self, value: u64) -> Result<()> {
            let mut state = self.bus.lock();
            if state.fail == Some(self.channel) {
                return Err(SinkError::Write {
                    channel: self.channel,
                    detail: "mock: write failure injected".into(),
                });
            }
            state.writes.push((self.channel, value));
            Ok(())
        }
    }
}
