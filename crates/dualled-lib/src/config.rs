//! Service configuration — TOML file naming the control files to drive.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# dualled configuration — control file paths for the shared LED and backlight.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backlight brightness control file.
    #[serde(default = "default_backlight_path")]
    pub backlight_path: PathBuf,

    /// File holding the panel's maximum brightness. Read once at startup;
    /// 255 is assumed when it cannot be read.
    #[serde(default = "default_backlight_max_path")]
    pub backlight_max_path: PathBuf,

    #[serde(default = "default_red_path")]
    pub red_path: PathBuf,

    #[serde(default = "default_green_path")]
    pub green_path: PathBuf,

    #[serde(default = "default_red_blink_path")]
    pub red_blink_path: PathBuf,

    #[serde(default = "default_green_blink_path")]
    pub green_blink_path: PathBuf,

    /// Value written to both blink channels while a solid color is shown.
    /// 0 = leave them cleared. Some LED drivers expect a nonzero value here.
    #[serde(default)]
    pub solid_blink_value: u64,
}

fn default_backlight_path() -> PathBuf {
    "/sys/class/leds/lcd-backlight/brightness".into()
}
fn default_backlight_max_path() -> PathBuf {
    "/sys/class/leds/lcd-backlight/max_brightness".into()
}
fn default_red_path() -> PathBuf {
    "/sys/class/leds/red/brightness".into()
}
fn default_green_path() -> PathBuf {
    "/sys/class/leds/green/brightness".into()
}
fn default_red_blink_path() -> PathBuf {
    "/sys/class/leds/red/blink".into()
}
fn default_green_blink_path() -> PathBuf {
    "/sys/class/leds/green/blink".into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backlight_path: default_backlight_path(),
            backlight_max_path: default_backlight_max_path(),
            red_path: default_red_path(),
            green_path: default_green_path(),
            red_blink_path: default_red_blink_path(),
            green_blink_path: default_green_blink_path(),
            solid_blink_value: 0,
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A control file path is empty.
    EmptyPath(&'static str),
    /// Two output channels point at the same control file.
    SharedPath {
        first: &'static str,
        second: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPath(field) => write!(f, "{field} cannot be empty"),
            ValidationError::SharedPath { first, second } => {
                write!(f, "{first} and {second} point at the same file")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dualled"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// The output control files, labelled by field name.
    pub fn output_paths(&self) -> [(&'static str, &Path); 5] {
        [
            ("backlight_path", self.backlight_path.as_path()),
            ("red_path", self.red_path.as_path()),
            ("green_path", self.green_path.as_path()),
            ("red_blink_path", self.red_blink_path.as_path()),
            ("green_blink_path", self.green_blink_path.as_path()),
        ]
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let outputs = self.output_paths();
        for (field, path) in outputs {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::EmptyPath(field));
            }
        }
        if self.backlight_max_path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath("backlight_max_path"));
        }

        for (i, (first, a)) in outputs.iter().enumerate() {
            for (second, b) in &outputs[i + 1..] {
                if !a.as_os_str().is_empty() && a == b {
                    errors.push(ValidationError::SharedPath {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
