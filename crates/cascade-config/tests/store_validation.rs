//! Store config validation tests for cascade-config.
// crates/cascade-config/tests/store_validation.rs
// =============================================================================
// Module: Store Config Validation Tests
// Description: Validate backend, path, and timeout constraints.
// Purpose: Ensure store settings fail closed.
// =============================================================================

use std::path::PathBuf;

use cascade_config::ConfigError;
use cascade_config::StoreBackend;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn sqlite_backend_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.backend = StoreBackend::Sqlite;
    config.store.path = None;
    assert_invalid(config.validate(), "sqlite backend requires store path")?;
    Ok(())
}

#[test]
fn sqlite_backend_with_path_passes() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.backend = StoreBackend::Sqlite;
    config.store.path = Some(PathBuf::from("/tmp/cascade.db"));
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn memory_backend_rejects_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.backend = StoreBackend::Memory;
    config.store.path = Some(PathBuf::from("/tmp/cascade.db"));
    assert_invalid(config.validate(), "memory backend does not take a store path")?;
    Ok(())
}

#[test]
fn zero_busy_timeout_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.busy_timeout_ms = 0;
    assert_invalid(config.validate(), "busy_timeout_ms")?;
    Ok(())
}

#[test]
fn oversized_busy_timeout_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.busy_timeout_ms = 120_000;
    assert_invalid(config.validate(), "busy_timeout_ms")?;
    Ok(())
}
