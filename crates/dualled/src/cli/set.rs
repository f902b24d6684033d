//! `set` subcommand — apply a single request to the configured control files.

use std::path::Path;

use super::{FlashArgs, LightId, Result, led, open_lights};

pub(super) fn cmd_set(
    light: &str,
    color: &str,
    flash: FlashArgs,
    config_path: Option<&Path>,
) -> Result<()> {
    let light = LightId::parse(light)?;
    let state = flash.state(led::parse_color(color)?);

    let lights = open_lights(config_path)?;
    lights.apply(light, state)?;

    log::debug!("{light} set to {}", led::format_color(state.color));
    Ok(())
}
