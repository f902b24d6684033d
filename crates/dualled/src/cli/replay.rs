//! `replay` subcommand — feed a sequence of requests through one controller.
//!
//! Every line is parsed before any control file is opened, so a malformed
//! input never half-applies.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::{DualledError, ReplayOutput, Result, kv, kv_width, open_lights, print_json};
use dualled_lib::light::Request;

/// Parse request lines. Blank lines and lines starting with `#` are skipped.
pub(super) fn parse_requests(reader: impl BufRead) -> Result<Vec<Request>> {
    let mut requests = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let request = trimmed.parse::<Request>().map_err(|e| {
            let detail = match e {
                DualledError::Request(msg) => msg,
                other => other.to_string(),
            };
            DualledError::Request(format!("line {}: {detail}", n + 1))
        })?;
        requests.push(request);
    }
    Ok(requests)
}

pub(super) fn cmd_replay(
    file: Option<&str>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let requests = match file {
        Some(path) => parse_requests(BufReader::new(File::open(path)?))?,
        None => parse_requests(io::stdin().lock())?,
    };

    let lights = open_lights(config_path)?;
    for r in &requests {
        log::debug!("applying {} -> {:?}", r.light, r.state);
        lights.apply(r.light, r.state)?;
    }
    let state = lights.snapshot();

    if json {
        return print_json(&ReplayOutput {
            applied: requests.len(),
            state,
        });
    }

    let w = kv_width(&["Applied:", "Shared LED:", "Backlight:"], &[]);
    kv("Applied:", format_args!("{} request(s)", requests.len()), w);
    match state.active {
        Some(slot) => kv("Shared LED:", slot, w),
        None => kv("Shared LED:", "off", w),
    }
    match state.backlight_level {
        Some(level) => kv(
            "Backlight:",
            format_args!("{level} / {}", state.max_brightness),
            w,
        ),
        None => kv("Backlight:", "(unchanged)", w),
    }
    Ok(())
}
