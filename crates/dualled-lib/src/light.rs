//! Logical light identifiers and requested light state.
//!
//! Identifiers follow the platform light-type numbering, so a request coming
//! from the host service layer can be converted with [`LightId::try_from`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DualledError, Result};
use crate::led::parse_color;

/// A logical light this service knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightId {
    Backlight = 0,
    Battery = 3,
    Notifications = 4,
    Attention = 5,
}

impl LightId {
    /// Every supported light, ordered by id.
    pub const ALL: [LightId; 4] = [
        LightId::Backlight,
        LightId::Battery,
        LightId::Notifications,
        LightId::Attention,
    ];

    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            LightId::Backlight => "backlight",
            LightId::Battery => "battery",
            LightId::Notifications => "notifications",
            LightId::Attention => "attention",
        }
    }

    /// The shared-LED slot this light feeds, or `None` for the backlight.
    pub fn slot(self) -> Option<Slot> {
        match self {
            LightId::Backlight => None,
            LightId::Battery => Some(Slot::Battery),
            LightId::Notifications => Some(Slot::Notification),
            LightId::Attention => Some(Slot::Attention),
        }
    }

    /// Parse a light name (case-insensitive) or a numeric id.
    ///
    /// Accepts `"notification"` as an alias for `"notifications"`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i32>() {
            return Self::try_from(id);
        }
        match s.to_lowercase().as_str() {
            "backlight" => Ok(LightId::Backlight),
            "battery" => Ok(LightId::Battery),
            "notifications" | "notification" => Ok(LightId::Notifications),
            "attention" => Ok(LightId::Attention),
            _ => Err(DualledError::UnknownLight(s.to_string())),
        }
    }
}

impl TryFrom<i32> for LightId {
    type Error = DualledError;

    fn try_from(id: i32) -> Result<Self> {
        match id {
            0 => Ok(LightId::Backlight),
            3 => Ok(LightId::Battery),
            4 => Ok(LightId::Notifications),
            5 => Ok(LightId::Attention),
            other => Err(DualledError::Unsupported(other)),
        }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three logical lights sharing the red/green LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Attention,
    Battery,
    Notification,
}

impl Slot {
    /// Arbitration order, highest priority first.
    pub const PRIORITY: [Slot; 3] = [Slot::Notification, Slot::Attention, Slot::Battery];

    pub(crate) fn index(self) -> usize {
        match self {
            Slot::Attention => 0,
            Slot::Battery => 1,
            Slot::Notification => 2,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Attention => write!(f, "attention"),
            Slot::Battery => write!(f, "battery"),
            Slot::Notification => write!(f, "notification"),
        }
    }
}

/// Flash behaviour requested for a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    None,
    Timed,
    /// Hardware-driven flashing. No hardware pattern exists on this LED, so
    /// it renders the same as `None`.
    Hardware,
}

/// A single request for a logical light.
///
/// `color` is packed `0xAARRGGBB`; the alpha byte is ignored everywhere.
/// The flash timings only matter when `flash_mode` is [`FlashMode::Timed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LightState {
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: u32,
    pub flash_off_ms: u32,
}

impl LightState {
    pub const OFF: LightState = LightState {
        color: 0,
        flash_mode: FlashMode::None,
        flash_on_ms: 0,
        flash_off_ms: 0,
    };

    pub fn solid(color: u32) -> Self {
        LightState {
            color,
            ..Self::OFF
        }
    }

    pub fn timed(color: u32, on_ms: u32, off_ms: u32) -> Self {
        LightState {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
        }
    }
}

/// Descriptor returned when listing the lights this service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HwLight {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: LightId,
    pub ordinal: i32,
}

impl From<LightId> for HwLight {
    fn from(kind: LightId) -> Self {
        HwLight {
            id: kind.id(),
            kind,
            ordinal: 0,
        }
    }
}

/// Descriptors for every supported light.
pub fn supported_lights() -> Vec<HwLight> {
    LightId::ALL.into_iter().map(HwLight::from).collect()
}

/// A request in text form: `<light> <color> [<on_ms> <off_ms>]`.
///
/// With timings the request is [`FlashMode::Timed`], otherwise solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub light: LightId,
    pub state: LightState,
}

impl FromStr for Request {
    type Err = DualledError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let (light, color, timing) = match fields.as_slice() {
            [light, color] => (light, color, None),
            [light, color, on, off] => (light, color, Some((on, off))),
            _ => {
                return Err(DualledError::Request(format!(
                    "expected `<light> <color> [<on_ms> <off_ms>]`, got {:?}",
                    s.trim()
                )));
            }
        };
        let light = LightId::parse(light)?;
        let color = parse_color(color)?;
        let state = match timing {
            None => LightState::solid(color),
            Some((on, off)) => {
                let ms = |v: &str| {
                    v.parse::<u32>()
                        .map_err(|_| DualledError::Request(format!("invalid duration: {v}")))
                };
                LightState::timed(color, ms(*on)?, ms(*off)?)
            }
        };
        Ok(Request { light, state })
    }
}
