//! Config load validation tests for cascade-config.
// crates/cascade-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use cascade_config::CascadeConfig;
use cascade_config::ConfigError;
use tempfile::NamedTempFile;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CascadeConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_without_path_yields_valid_defaults() -> TestResult {
    let config = CascadeConfig::load(None).map_err(|err| err.to_string())?;
    let defaults = common::minimal_config().map_err(|err| err.to_string())?;
    if config == defaults { Ok(()) } else { Err("defaults drifted".to_string()) }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(CascadeConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(CascadeConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(CascadeConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(CascadeConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[server]\nbind = \"127.0.0.1:8080\"\nmystery = 1\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(CascadeConfig::load(Some(file.path())), "config parse failed")?;
    Ok(())
}

#[test]
fn load_accepts_minimal_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[server]\nbind = \"127.0.0.1:9090\"\n")
        .map_err(|err| err.to_string())?;
    let config = CascadeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.server.bind == "127.0.0.1:9090" {
        Ok(())
    } else {
        Err("bind not applied".to_string())
    }
}

#[test]
fn sample_config_parses_and_validates() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(CascadeConfig::sample_toml().as_bytes())
        .map_err(|err| err.to_string())?;
    CascadeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    Ok(())
}
