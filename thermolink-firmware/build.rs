//! Build script for thermolink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates endpoint.toml and turns it into a const initializer

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Baud rate limits, kept in step with `thermolink_core::config`
const MIN_BAUDRATE: i64 = 1200;
const MAX_BAUDRATE: i64 = 921_600;

/// Accepted thermocouple names and their `ThermocoupleType` variants
const THERMOCOUPLES: &[(&str, &str)] = &[
    ("B", "B"),
    ("E", "E"),
    ("J", "J"),
    ("K", "K"),
    ("N", "N"),
    ("R", "R"),
    ("S", "S"),
    ("T", "T"),
    ("G8", "VoltageGain8"),
    ("G32", "VoltageGain32"),
];

/// Settings pulled out of endpoint.toml
struct Settings {
    baudrate: u32,
    reset_on_connect: bool,
    thermocouple: &'static str,
    startup_power: u8,
}

fn main() {
    setup_linker();
    let settings = validate_config();
    write_config(&settings);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate endpoint.toml at compile time
fn validate_config() -> Settings {
    println!("cargo:rerun-if-changed=endpoint.toml");

    let config_path = Path::new("endpoint.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: endpoint.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires an endpoint.toml configuration file.      ║\n\
            ║  Please create one in the thermolink-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read endpoint.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in endpoint.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let settings = Settings {
        baudrate: validate_baudrate(&config, &mut errors),
        reset_on_connect: validate_reset_on_connect(&config, &mut errors),
        thermocouple: validate_thermocouple(&config, &mut errors),
        startup_power: validate_startup_power(&config, &mut errors),
    };

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid endpoint configuration                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=endpoint.toml validated successfully");
    settings
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Look up `[section] key`, if present
fn field<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn validate_baudrate(config: &toml::Value, errors: &mut Vec<String>) -> u32 {
    match field(config, "link", "baudrate") {
        None => 115_200,
        Some(toml::Value::Integer(rate)) if (MIN_BAUDRATE..=MAX_BAUDRATE).contains(rate) => {
            *rate as u32
        }
        Some(_) => {
            errors.push(format!(
                "[link] baudrate must be {}-{}",
                MIN_BAUDRATE, MAX_BAUDRATE
            ));
            0
        }
    }
}

fn validate_reset_on_connect(config: &toml::Value, errors: &mut Vec<String>) -> bool {
    match field(config, "link", "reset_on_connect") {
        None => true,
        Some(toml::Value::Boolean(flag)) => *flag,
        Some(_) => {
            errors.push("[link] reset_on_connect must be true or false".to_string());
            true
        }
    }
}

fn validate_thermocouple(config: &toml::Value, errors: &mut Vec<String>) -> &'static str {
    match field(config, "heater", "thermocouple") {
        None => "K",
        Some(toml::Value::String(name)) => {
            match THERMOCOUPLES
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
            {
                Some((_, variant)) => *variant,
                None => {
                    errors.push(format!("[heater] unknown thermocouple type '{}'", name));
                    "K"
                }
            }
        }
        Some(_) => {
            errors.push("[heater] thermocouple must be a string".to_string());
            "K"
        }
    }
}

fn validate_startup_power(config: &toml::Value, errors: &mut Vec<String>) -> u8 {
    match field(config, "heater", "startup_power") {
        None => 0,
        Some(toml::Value::Integer(level)) if (0..=255).contains(level) => *level as u8,
        Some(_) => {
            errors.push("[heater] startup_power must be 0-255".to_string());
            0
        }
    }
}

/// Write the `EndpointConfig` initializer included by main.rs
fn write_config(settings: &Settings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("endpoint_config.rs")).unwrap();
    write!(
        f,
        "EndpointConfig {{\n    \
            baudrate: {},\n    \
            thermocouple: ThermocoupleType::{},\n    \
            startup_power: {},\n    \
            reset_on_connect: {},\n\
        }}\n",
        settings.baudrate, settings.thermocouple, settings.startup_power, settings.reset_on_connect
    )
    .unwrap();
}
