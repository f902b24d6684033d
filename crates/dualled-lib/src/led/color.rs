//! Color parsing and formatting for light requests.
//!
//! Colors use the packed request format `0xAARRGGBB`; the alpha byte is
//! carried through but never rendered.

use crate::error::{DualledError, Result};

/// Parse a color string into the packed `0xAARRGGBB` format.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"0xff0000"`
/// - Hex with alpha: `"#80FF0000"`
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"yellow"`, `"orange"`, `"off"`
pub fn parse_color(s: &str) -> Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0x00FF_0000),
        "green" => return Ok(0x0000_FF00),
        "blue" => return Ok(0x0000_00FF),
        "white" => return Ok(0x00FF_FFFF),
        "yellow" => return Ok(0x00FF_FF00),
        "orange" => return Ok(0x00FF_8000),
        "off" | "black" => return Ok(0),
        _ => {}
    }

    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if hex.len() != 6 && hex.len() != 8 {
        return Err(DualledError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        )));
    }
    // from_str_radix alone would accept a leading '+'
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DualledError::Color(format!("Invalid hex color: {s}")));
    }
    u32::from_str_radix(hex, 16).map_err(|_| DualledError::Color(format!("Invalid hex color: {s}")))
}

/// Format a packed color as `#RRGGBB`, dropping alpha.
pub fn format_color(val: u32) -> String {
    format!("#{:06X}", val & super::encoder::RGB_MASK)
}
