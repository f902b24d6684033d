//! CLI subcommands — list lights, encode requests, drive the LED, show config.

mod config_cmd;
mod encode;
mod lights;
mod replay;
mod set;

use std::path::Path;

use clap::{Args, Subcommand};
use serde::Serialize;

pub(super) use dualled_lib::config::Config;
pub(super) use dualled_lib::controller::Snapshot;
pub(super) use dualled_lib::error::{DualledError, Result};
pub(super) use dualled_lib::led;
pub(super) use dualled_lib::light::{self, HwLight, LightId, LightState};
pub(super) use dualled_lib::Lights;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Load the config from `custom_path`, or from the default location.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Load and validate the config, then open every control file it names.
pub(super) fn open_lights(
    custom_path: Option<&Path>,
) -> Result<Lights<dualled_lib::sink::SysfsSink>> {
    let config = load_config(custom_path);
    if let Err(errors) = config.validate() {
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(DualledError::Config(joined.join("; ")));
    }
    Lights::open(&config)
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DualledError::Io(std::io::Error::other(e)))?;
    println!("{json}");
    Ok(())
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct LightsOutput {
    pub count: usize,
    pub lights: Vec<HwLight>,
}

#[derive(Serialize)]
pub(super) struct WriteJson {
    pub channel: String,
    pub value: u64,
}

#[derive(Serialize)]
pub(super) struct BlinkJson {
    pub duty: u32,
    pub off: u64,
}

#[derive(Serialize)]
pub(super) struct EncodeOutput {
    pub color: String,
    pub lit: bool,
    pub brightness: u32,
    pub backlight_level: u32,
    pub blink: Option<BlinkJson>,
    pub writes: Vec<WriteJson>,
}

#[derive(Serialize)]
pub(super) struct ReplayOutput {
    pub applied: usize,
    pub state: Snapshot,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

/// Optional flash timing shared by `encode` and `set`.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct FlashArgs {
    /// Flash on-time in milliseconds (requires --off-ms)
    #[arg(long, requires = "off_ms")]
    pub on_ms: Option<u32>,
    /// Flash off-time in milliseconds (requires --on-ms)
    #[arg(long, requires = "on_ms")]
    pub off_ms: Option<u32>,
}

impl FlashArgs {
    pub(super) fn state(self, color: u32) -> LightState {
        match (self.on_ms, self.off_ms) {
            (Some(on), Some(off)) => LightState::timed(color, on, off),
            _ => LightState::solid(color),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the supported lights
    Lights,

    /// Show how a request would be rendered, without touching hardware
    Encode {
        /// Color (#RRGGBB, #AARRGGBB, 0x..., or a name)
        color: String,
        #[command(flatten)]
        flash: FlashArgs,
        /// Backlight ceiling used for the scaled level
        #[arg(long, default_value_t = dualled_lib::sink::DEFAULT_MAX_BRIGHTNESS)]
        max_brightness: u32,
    },

    /// Apply one request to the configured control files (other LED lights start off)
    Set {
        /// Light name (backlight, battery, notifications, attention) or numeric id
        light: String,
        /// Color (#RRGGBB, #AARRGGBB, 0x..., or a name)
        color: String,
        #[command(flatten)]
        flash: FlashArgs,
    },

    /// Apply a sequence of requests, one per line: `<light> <color> [<on_ms> <off_ms>]`
    Replay {
        /// File to read requests from (default: stdin)
        file: Option<String>,
    },

    /// Show current configuration and file paths
    Config {
        /// Write a config file with the default settings
        #[arg(long)]
        init: bool,
        /// With --init, replace an existing config file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Lights => lights::cmd_lights(json),
        Command::Encode {
            color,
            flash,
            max_brightness,
        } => encode::cmd_encode(&color, flash, max_brightness, config_path, json),
        Command::Set {
            light,
            color,
            flash,
        } => {
            if json {
                warn_json_unsupported("set");
            }
            set::cmd_set(&light, &color, flash, config_path)
        }
        Command::Replay { file } => replay::cmd_replay(file.as_deref(), config_path, json),
        Command::Config { init: true, force } => {
            if json {
                warn_json_unsupported("config --init");
            }
            config_cmd::cmd_config_init(config_path, force)
        }
        Command::Config { init: false, .. } => config_cmd::cmd_config(config_path, json),
    }
}
