//! `config` subcommand — show current configuration and file paths, or
//! write a default config file with `--init`.

use std::path::Path;

use super::{
    Config, ConfigOutput, DualledError, Result, kv, kv_indent, kv_width, load_config, print_json,
};

pub(super) fn cmd_config_init(custom_path: Option<&Path>, force: bool) -> Result<()> {
    let path = custom_path
        .map(Path::to_path_buf)
        .or_else(Config::path)
        .ok_or_else(|| DualledError::Config("no config directory".into()))?;
    if path.exists() && !force {
        return Err(DualledError::Config(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub(super) fn cmd_config(custom_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
        });
    }

    let w = kv_width(
        &["Config file:"],
        &[
            "backlight_path:",
            "backlight_max_path:",
            "red_path:",
            "green_path:",
            "red_blink_path:",
            "green_blink_path:",
            "solid_blink_value:",
        ],
    );

    match &config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("backlight_path:", config.backlight_path.display(), w);
    kv_indent("backlight_max_path:", config.backlight_max_path.display(), w);
    kv_indent("red_path:", config.red_path.display(), w);
    kv_indent("green_path:", config.green_path.display(), w);
    kv_indent("red_blink_path:", config.red_blink_path.display(), w);
    kv_indent("green_blink_path:", config.green_blink_path.display(), w);
    kv_indent("solid_blink_value:", config.solid_blink_value, w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}
