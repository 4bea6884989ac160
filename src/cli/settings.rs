//! `flava set` / `flava unset` handlers.

use crate::core::config::data::Config;
use crate::core::mode::Mode;
use std::error::Error;
use std::path::PathBuf;

pub const CONFIG_KEYS: &[&str] = &["backend-route", "default-mode", "storage-key", "data-dir"];

pub fn set_config_value(key: Option<&str>, value: &[String]) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let Some(key) = key else {
        config.print_all();
        return Ok(());
    };
    let value = value.join(" ");
    if value.trim().is_empty() {
        config.print_all();
        return Ok(());
    }

    if let Err(message) = apply_set(&mut config, key, value.trim()) {
        eprintln!("❌ {message}");
        std::process::exit(1);
    }
    config.save()?;
    println!("✅ Set {key} to: {}", value.trim());
    Ok(())
}

pub fn unset_config_value(key: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    if let Err(message) = apply_unset(&mut config, key) {
        eprintln!("❌ {message}");
        std::process::exit(1);
    }
    config.save()?;
    println!("✅ Unset {key}");
    Ok(())
}

pub fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    match key {
        "backend-route" => config.backend_route = Some(value.to_string()),
        "default-mode" => config.default_mode = Some(value.parse::<Mode>()?),
        "storage-key" => config.storage_key = Some(value.to_string()),
        "data-dir" => config.data_dir = Some(PathBuf::from(value)),
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

pub fn apply_unset(config: &mut Config, key: &str) -> Result<(), String> {
    match key {
        "backend-route" => config.backend_route = None,
        "default-mode" => config.default_mode = None,
        "storage-key" => config.storage_key = None,
        "data-dir" => config.data_dir = None,
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key} (expected one of: {})",
        CONFIG_KEYS.join(", ")
    )
}
