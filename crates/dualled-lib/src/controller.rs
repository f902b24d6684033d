//! Arbitration controller — routes light requests to the shared LED or the
//! backlight.
//!
//! Attention, battery and notification share one red/green LED. Each request
//! replaces the stored state of its slot and re-runs arbitration over all
//! three from scratch: the highest-priority lit slot is rendered, or the LED
//! is switched off when none is lit. The backlight has a single writer and is
//! scaled to the panel's maximum brightness.
//!
//! The LED and the backlight are guarded by separate locks; each lock covers
//! the whole update-arbitrate-write sequence of its path.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::config::Config;
use crate::error::{DualledError, Result};
use crate::led::{self, format_color};
use crate::light::{self, HwLight, LightId, LightState, Slot};
use crate::sink::{self, Channel, LedSurface, Sink, SysfsSink};

// ── Slots ──

/// Latest request for each of the three shared-LED slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slots([LightState; 3]);

impl Slots {
    pub fn get(&self, slot: Slot) -> LightState {
        self.0[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, state: LightState) {
        self.0[slot.index()] = state;
    }

    /// The slot that owns the LED: the first lit slot in priority order.
    pub fn winner(&self) -> Option<(Slot, LightState)> {
        Slot::PRIORITY
            .into_iter()
            .map(|slot| (slot, self.get(slot)))
            .find(|(_, state)| led::is_lit(state.color))
    }
}

struct SharedLed<S> {
    slots: Slots,
    surface: LedSurface<S>,
    solid_blink_value: u64,
}

impl<S: Sink> SharedLed<S> {
    /// Render the current winner. Stops at the first failed write.
    fn render(&mut self) -> sink::Result<()> {
        let writes = match self.slots.winner() {
            Some((slot, state)) => {
                log::debug!(
                    "shared LED: {slot} wins ({}, {:?})",
                    format_color(state.color),
                    state.flash_mode
                );
                led::render(&state, self.solid_blink_value)
            }
            None => {
                log::debug!("shared LED: nothing lit, switching off");
                led::render_off()
            }
        };
        for w in writes {
            self.surface.write(w.channel, w.value)?;
        }
        Ok(())
    }
}

struct Backlight<S> {
    sink: S,
    max: u32,
    level: Option<u32>,
}

// ── Controller ──

/// Point-in-time view of the controller, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub active: Option<Slot>,
    pub attention: LightState,
    pub battery: LightState,
    pub notification: LightState,
    pub backlight_level: Option<u32>,
    pub max_brightness: u32,
}

/// Owns the shared LED surface and the backlight sink.
pub struct Lights<S> {
    led: Mutex<SharedLed<S>>,
    backlight: Mutex<Backlight<S>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| {
        log::warn!("light state mutex poisoned, recovering");
        e.into_inner()
    })
}

impl<S: Sink> Lights<S> {
    /// Create a controller with every slot off. `max_brightness` is the
    /// backlight ceiling and never changes afterwards.
    pub fn new(surface: LedSurface<S>, backlight: S, max_brightness: u32) -> Self {
        Lights {
            led: Mutex::new(SharedLed {
                slots: Slots::default(),
                surface,
                solid_blink_value: 0,
            }),
            backlight: Mutex::new(Backlight {
                sink: backlight,
                max: max_brightness,
                level: None,
            }),
        }
    }

    /// Value written to both blink channels before a solid color (0 = none).
    pub fn with_solid_blink_value(self, value: u64) -> Self {
        lock(&self.led).solid_blink_value = value;
        self
    }

    /// The lights this controller accepts requests for.
    pub fn lights(&self) -> Vec<HwLight> {
        light::supported_lights()
    }

    /// Apply a request for a raw light id.
    ///
    /// Returns `Err(Unsupported)` without touching any state if `id` is not a
    /// supported light.
    pub fn set_light_state(&self, id: i32, state: LightState) -> Result<()> {
        let light = LightId::try_from(id)?;
        self.apply(light, state)
    }

    /// Dispatch a request to the backlight or to the shared LED.
    pub fn apply(&self, light: LightId, state: LightState) -> Result<()> {
        match light.slot() {
            Some(slot) => self.apply_arbitrated(slot, state),
            None => self.apply_backlight(state),
        }
    }

    /// Write the perceptual brightness of `state`, scaled to the panel maximum.
    pub fn apply_backlight(&self, state: LightState) -> Result<()> {
        let mut bl = lock(&self.backlight);
        let brightness = led::brightness(state.color);
        let level = led::scale_brightness(brightness, bl.max);
        if level != brightness {
            log::debug!("scaling brightness {brightness} => {level}");
        }
        bl.sink.write(u64::from(level))?;
        bl.level = Some(level);
        Ok(())
    }

    /// Store `state` in `slot` and re-render the shared LED.
    ///
    /// The slot keeps the new state even if a write fails; the LED catches
    /// up on the next successful render.
    pub fn apply_arbitrated(&self, slot: Slot, state: LightState) -> Result<()> {
        let mut shared = lock(&self.led);
        shared.slots.set(slot, state);
        shared.render().map_err(|e| {
            log::warn!("{slot} update left the LED out of sync: {e}");
            DualledError::from(e)
        })
    }

    pub fn slot_state(&self, slot: Slot) -> LightState {
        lock(&self.led).slots.get(slot)
    }

    /// The slot currently shown on the shared LED, if any.
    pub fn active_slot(&self) -> Option<Slot> {
        lock(&self.led).slots.winner().map(|(slot, _)| slot)
    }

    /// Last value successfully written to the backlight.
    pub fn backlight_level(&self) -> Option<u32> {
        lock(&self.backlight).level
    }

    pub fn max_brightness(&self) -> u32 {
        lock(&self.backlight).max
    }

    pub fn snapshot(&self) -> Snapshot {
        let slots = lock(&self.led).slots;
        let bl = lock(&self.backlight);
        Snapshot {
            active: slots.winner().map(|(slot, _)| slot),
            attention: slots.get(Slot::Attention),
            battery: slots.get(Slot::Battery),
            notification: slots.get(Slot::Notification),
            backlight_level: bl.level,
            max_brightness: bl.max,
        }
    }
}

impl Lights<SysfsSink> {
    /// Open every control file named in `config` and read the backlight
    /// maximum once.
    pub fn open(config: &Config) -> Result<Self> {
        let surface = LedSurface::open(
            &config.red_path,
            &config.green_path,
            &config.red_blink_path,
            &config.green_blink_path,
        )?;
        let backlight = SysfsSink::open(Channel::Backlight, &config.backlight_path)?;
        let max = sink::read_max_brightness(&config.backlight_max_path);
        log::debug!(
            "backlight {} opened, max brightness {max}",
            backlight.path().display()
        );
        Ok(Lights::new(surface, backlight, max).with_solid_blink_value(config.solid_blink_value))
    }
}
