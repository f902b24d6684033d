//! `encode` subcommand — show brightness, blink parameters and the ordered
//! channel writes for a request, without touching hardware.

use std::path::Path;

use super::{
    BlinkJson, EncodeOutput, FlashArgs, LightState, Result, WriteJson, kv, kv_indent, kv_width,
    led, load_config, print_json,
};

pub(super) fn encode_report(
    state: &LightState,
    max_brightness: u32,
    solid_blink_value: u64,
) -> EncodeOutput {
    let brightness = led::brightness(state.color);
    EncodeOutput {
        color: led::format_color(state.color),
        lit: led::is_lit(state.color),
        brightness,
        backlight_level: led::scale_brightness(brightness, max_brightness),
        blink: led::BlinkParams::for_state(state).map(|b| BlinkJson {
            duty: b.duty,
            off: b.off,
        }),
        writes: led::render(state, solid_blink_value)
            .into_iter()
            .map(|w| WriteJson {
                channel: w.channel.to_string(),
                value: w.value,
            })
            .collect(),
    }
}

pub(super) fn cmd_encode(
    color: &str,
    flash: FlashArgs,
    max_brightness: u32,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let state = flash.state(led::parse_color(color)?);
    let config = load_config(config_path);
    let report = encode_report(&state, max_brightness, config.solid_blink_value);

    if json {
        return print_json(&report);
    }

    let w = kv_width(
        &["Color:", "Lit:", "Brightness:", "Backlight:", "Blink:"],
        &["green blink"],
    );
    kv("Color:", &report.color, w);
    kv("Lit:", if report.lit { "yes" } else { "no" }, w);
    kv("Brightness:", report.brightness, w);
    kv(
        "Backlight:",
        format_args!("{} (max {max_brightness})", report.backlight_level),
        w,
    );
    match &report.blink {
        Some(b) => kv("Blink:", format_args!("duty {}, off {}", b.duty, b.off), w),
        None => kv("Blink:", "none (solid)", w),
    }
    println!();
    println!("Shared LED writes:");
    for write in &report.writes {
        kv_indent(&write.channel, write.value, w);
    }
    Ok(())
}
