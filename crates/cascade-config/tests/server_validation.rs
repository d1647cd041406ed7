//! Server config validation tests for cascade-config.
// crates/cascade-config/tests/server_validation.rs
// =============================================================================
// Module: Server Config Validation Tests
// Description: Validate bind, body-cap, and timeout constraints.
// Purpose: Ensure server settings fail closed and enforce limits.
// =============================================================================

use cascade_config::ConfigError;

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
fn bind_must_be_a_socket_address() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "not-an-address".to_string();
    assert_invalid(config.validate(), "server bind is not a socket address")?;
    Ok(())
}

#[test]
fn non_loopback_bind_requires_explicit_allow() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "0.0.0.0:8080".to_string();
    assert_invalid(config.validate(), "non-loopback bind disallowed without allow_non_loopback")?;
    Ok(())
}

#[test]
fn non_loopback_bind_passes_with_allow() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "0.0.0.0:8080".to_string();
    config.server.allow_non_loopback = true;
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn ipv6_loopback_passes_without_allow() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "[::1]:8080".to_string();
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn zero_body_cap_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "max_body_bytes")?;
    Ok(())
}

#[test]
fn oversized_body_cap_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 9 * 1_048_576;
    assert_invalid(config.validate(), "max_body_bytes")?;
    Ok(())
}

#[test]
fn zero_request_timeout_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.request_timeout_ms = 0;
    assert_invalid(config.validate(), "request_timeout_ms")?;
    Ok(())
}

#[test]
fn oversized_request_timeout_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.request_timeout_ms = 600_000;
    assert_invalid(config.validate(), "request_timeout_ms")?;
    Ok(())
}
