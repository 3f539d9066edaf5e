//! Build script for errlog-runtime
//!
//! Produces `OUT_DIR/errlog_config.rs` with the compile-time settings:
//! 1. Library defaults
//! 2. Overridden by a user file named in `ERRLOG_CONFIG_RS`
//! 3. Overridden by per-setting env vars (`ERRLOG_HIST_SIZE=8`)
//!
//! The history capacity must be known at compile time because the ring
//! is a fixed-size array inside the reporter.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

struct ConfigParam {
    name: &'static str,
    rust_type: &'static str,
    default_value: &'static str,
}

const CONFIG_PARAMS: &[ConfigParam] = &[
    ConfigParam {
        name: "HIST_SIZE",
        rust_type: "usize",
        default_value: "4",
    },
    ConfigParam {
        name: "FILENAME_CAPTURE",
        rust_type: "bool",
        default_value: "true",
    },
];

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("errlog_config.rs");

    let mut config: HashMap<&str, String> = CONFIG_PARAMS
        .iter()
        .map(|p| (p.name, p.default_value.to_string()))
        .collect();

    if let Ok(user_path) = env::var("ERRLOG_CONFIG_RS") {
        println!("cargo:rerun-if-changed={}", user_path);
        match fs::read_to_string(&user_path) {
            Ok(content) => {
                parse_and_merge(&content, &mut config);
                println!("cargo:warning=Using custom errlog config: {}", user_path);
            }
            Err(e) => {
                println!(
                    "cargo:warning=Failed to read ERRLOG_CONFIG_RS ({}): {}",
                    user_path, e
                );
            }
        }
    }
    println!("cargo:rerun-if-env-changed=ERRLOG_CONFIG_RS");

    for param in CONFIG_PARAMS {
        let key = format!("ERRLOG_{}", param.name);
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = env::var(&key) {
            config.insert(param.name, value.trim().to_string());
        }
    }

    if let Some(size) = config.get("HIST_SIZE") {
        match size.replace('_', "").parse::<usize>() {
            Ok(n) if n > 0 => {}
            _ => panic!("HIST_SIZE must be a positive integer literal, got {:?}", size),
        }
    }

    let output = generate_config(&config);
    fs::write(&dest_path, output).expect("Failed to write errlog config");
}

/// Merge `pub const NAME: TYPE = VALUE;` lines from a user file
fn parse_and_merge(content: &str, config: &mut HashMap<&str, String>) {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || !line.starts_with("pub const ") {
            continue;
        }
        let Some((name, value)) = parse_const_line(line) else {
            continue;
        };
        match CONFIG_PARAMS.iter().find(|p| p.name == name) {
            Some(param) => {
                config.insert(param.name, value);
            }
            None => println!("cargo:warning=Unknown errlog config parameter: {}", name),
        }
    }
}

fn parse_const_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("pub const ")?.trim();
    let colon_pos = rest.find(':')?;
    let name = rest[..colon_pos].trim().to_string();
    let eq_pos = rest.find('=')?;
    let semi_pos = rest.rfind(';').unwrap_or(rest.len());
    let value = rest[eq_pos + 1..semi_pos].trim().to_string();
    Some((name, value))
}

fn generate_config(config: &HashMap<&str, String>) -> String {
    let mut output = String::from("// Auto-generated by build.rs - do not edit\n\n");
    for param in CONFIG_PARAMS {
        let value = config
            .get(param.name)
            .map(String::as_str)
            .unwrap_or(param.default_value);
        output.push_str(&format!(
            "pub const {}: {} = {};\n",
            param.name, param.rust_type, value
        ));
    }
    output
}
