//! `lights` subcommand — list the supported lights.

use super::{LightsOutput, Result, light, print_json};

pub(super) fn cmd_lights(json: bool) -> Result<()> {
    let lights = light::supported_lights();

    if json {
        return print_json(&LightsOutput {
            count: lights.len(),
            lights,
        });
    }

    println!("Supported lights:");
    println!();
    for l in &lights {
        println!("  [{}] {}", l.id, l.kind);
    }
    Ok(())
}
