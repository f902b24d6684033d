//! Signal encoding — luma, lit predicate, blink PWM parameters, and the
//! ordered channel writes that render one light on the shared LED.

use crate::light::{FlashMode, LightState};
use crate::sink::{DEFAULT_MAX_BRIGHTNESS, LedChannel};

/// The blink controller ignores the low 4 bits of the duty value.
pub const MIN_VISIBLE_DUTY: u32 = 16;

/// Ignore the alpha byte of a packed `0xAARRGGBB` color.
pub const RGB_MASK: u32 = 0x00FF_FFFF;

pub fn red(color: u32) -> u32 {
    (color >> 16) & 0xFF
}

pub fn green(color: u32) -> u32 {
    (color >> 8) & 0xFF
}

pub fn blue(color: u32) -> u32 {
    color & 0xFF
}

/// Perceptual brightness of a color, `(77*R + 150*G + 29*B) >> 8`. Always in `0..=255`.
pub fn brightness(color: u32) -> u32 {
    let color = color & RGB_MASK;
    (77 * red(color) + 150 * green(color) + 29 * blue(color)) >> 8
}

/// A light is lit when any of its RGB components is nonzero.
pub fn is_lit(color: u32) -> bool {
    color & RGB_MASK != 0
}

/// Linearly rescale a `0..=255` brightness to a panel with a different ceiling.
///
/// Identity when `max` is the default ceiling.
pub fn scale_brightness(brightness: u32, max: u32) -> u32 {
    if max == DEFAULT_MAX_BRIGHTNESS {
        return brightness;
    }
    (u64::from(brightness) * u64::from(max) / u64::from(DEFAULT_MAX_BRIGHTNESS)) as u32
}

/// Parameters written to the blink controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkParams {
    /// On-time ratio scaled to `0..=255`, written in place of the intensity.
    pub duty: u32,
    /// Off period in microseconds, written to the blink channel.
    pub off: u64,
}

impl BlinkParams {
    /// Blink parameters for an on/off period, or `None` if either half is zero.
    pub fn from_timing(on_ms: u32, off_ms: u32) -> Option<Self> {
        if on_ms == 0 || off_ms == 0 {
            return None;
        }
        let total = u64::from(on_ms) + u64::from(off_ms);
        let mut duty = (u64::from(on_ms) * 255 / total) as u32;
        if duty > 0 && duty < MIN_VISIBLE_DUTY {
            duty = MIN_VISIBLE_DUTY;
        }
        Some(BlinkParams {
            duty,
            off: u64::from(off_ms) * 1000,
        })
    }

    /// Blink parameters for a request; only `FlashMode::Timed` ever blinks.
    pub fn for_state(state: &LightState) -> Option<Self> {
        match state.flash_mode {
            FlashMode::Timed => Self::from_timing(state.flash_on_ms, state.flash_off_ms),
            FlashMode::None | FlashMode::Hardware => None,
        }
    }
}

/// A single value destined for one LED channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedWrite {
    pub channel: LedChannel,
    pub value: u64,
}

impl LedWrite {
    pub fn new(channel: LedChannel, value: impl Into<u64>) -> Self {
        LedWrite {
            channel,
            value: value.into(),
        }
    }
}

/// Writes that turn the shared LED fully off.
pub fn render_off() -> Vec<LedWrite> {
    vec![
        LedWrite::new(LedChannel::Red, 0u32),
        LedWrite::new(LedChannel::Green, 0u32),
        LedWrite::new(LedChannel::RedBlink, 0u32),
        LedWrite::new(LedChannel::GreenBlink, 0u32),
    ]
}

/// Ordered writes that render `state` on the shared LED.
///
/// Both blink channels are cleared first. A blinking light drives only one
/// color: red if it has any red, else green. A blue-only blink clears the
/// blink channels and writes nothing else.
///
/// Solid colors are written red-then-green, except when red is set and green
/// is not, which is written green-then-red. Some controllers latch each
/// channel as it is written, and this order avoids a visible intermediate
/// color on them.
///
/// `solid_blink_value`, when nonzero, is written to both blink channels
/// before a solid color.
pub fn render(state: &LightState, solid_blink_value: u64) -> Vec<LedWrite> {
    let r = red(state.color);
    let g = green(state.color);

    let mut writes = vec![
        LedWrite::new(LedChannel::RedBlink, 0u32),
        LedWrite::new(LedChannel::GreenBlink, 0u32),
    ];

    if let Some(blink) = BlinkParams::for_state(state) {
        let pair = if r != 0 {
            Some((LedChannel::Red, LedChannel::RedBlink))
        } else if g != 0 {
            Some((LedChannel::Green, LedChannel::GreenBlink))
        } else {
            None
        };
        if let Some((intensity, period)) = pair {
            writes.push(LedWrite::new(intensity, blink.duty));
            writes.push(LedWrite::new(period, blink.off));
        }
        return writes;
    }

    if solid_blink_value != 0 {
        writes.push(LedWrite::new(LedChannel::RedBlink, solid_blink_value));
        writes.push(LedWrite::new(LedChannel::GreenBlink, solid_blink_value));
    }

    let red_write = LedWrite::new(LedChannel::Red, r);
    let green_write = LedWrite::new(LedChannel::Green, g);
    if r == 0 || g != 0 {
        writes.extend([red_write, green_write]);
    } else {
        writes.extend([green_write, red_write]);
    }
    writes
}
