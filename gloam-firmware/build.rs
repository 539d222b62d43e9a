//! Build script for gloam-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates dimmer.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate dimmer.toml configuration at compile time
fn validate_config() {
    // Re-run if dimmer.toml changes
    println!("cargo:rerun-if-changed=dimmer.toml");

    let config_path = Path::new("dimmer.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: dimmer.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a dimmer.toml configuration file.         ║\n\
            ║  Please create one in the gloam-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!("Failed to read dimmer.toml: {}", e);
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in dimmer.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);
    validate_values(&config);

    println!("cargo:warning=dimmer.toml validated successfully");
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

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    for section in ["fade", "input", "schedule", "indicator", "control", "servo"] {
        if config.get(section).is_none() {
            errors.push(format!("Missing required [{}] section", section));
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Missing required sections in dimmer.toml                 ║\n\
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
}

/// Validate section contents
fn validate_values(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(fade) = config.get("fade").and_then(|v| v.as_table()) {
        if let Some(step) = fade.get("step_size").and_then(|v| v.as_integer()) {
            if !(1..=100).contains(&step) {
                errors.push("[fade] step_size must be 1-100".to_string());
            }
        }
        if let Some(span) = fade.get("actuator_span").and_then(|v| v.as_integer()) {
            if !(1..=360).contains(&span) {
                errors.push("[fade] actuator_span must be 1-360".to_string());
            }
        }
    }

    if let Some(input) = config.get("input").and_then(|v| v.as_table()) {
        let long = input.get("long_press_ms").and_then(|v| v.as_integer());
        let diag = input.get("diagnostic_press_ms").and_then(|v| v.as_integer());
        if let (Some(long), Some(diag)) = (long, diag) {
            if long >= diag {
                errors.push("[input] long_press_ms must be below diagnostic_press_ms".to_string());
            }
        }
    }

    if let Some(schedule) = config.get("schedule").and_then(|v| v.as_table()) {
        for key in ["on_hour", "off_hour"] {
            if let Some(hour) = schedule.get(key).and_then(|v| v.as_integer()) {
                if !(0..=23).contains(&hour) {
                    errors.push(format!("[schedule] {} must be 0-23", key));
                }
            }
        }
    }

    if let Some(servo) = config.get("servo").and_then(|v| v.as_table()) {
        let min = servo.get("min_pulse_us").and_then(|v| v.as_integer());
        let max = servo.get("max_pulse_us").and_then(|v| v.as_integer());
        if let (Some(min), Some(max)) = (min, max) {
            if min >= max {
                errors.push("[servo] min_pulse_us must be below max_pulse_us".to_string());
            }
            if max > 20_000 {
                errors.push("[servo] max_pulse_us must fit in the 20 ms frame".to_string());
            }
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid dimmer.toml configuration                        ║\n\
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
}
