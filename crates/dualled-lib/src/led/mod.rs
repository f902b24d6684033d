//! Shared-LED signal encoding and color helpers.

mod color;
mod encoder;

pub use color::{format_color, parse_color};
pub use encoder::{
    BlinkParams, LedWrite, MIN_VISIBLE_DUTY, RGB_MASK, blue, brightness, green, is_lit, red,
    render, render_off, scale_brightness,
};
