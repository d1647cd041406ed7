//! Limits config validation tests for cascade-config.
// crates/cascade-config/tests/limits_validation.rs
// =============================================================================
// Module: Limits Config Validation Tests
// Description: Validate directory size and paging limit constraints.
// Purpose: Ensure limit settings fail closed.
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
fn zero_unit_limit_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_units_per_fiscal_year = 0;
    assert_invalid(config.validate(), "max_units_per_fiscal_year")?;
    Ok(())
}

#[test]
fn zero_component_limit_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_components_per_fiscal_year = 0;
    assert_invalid(config.validate(), "max_components_per_fiscal_year")?;
    Ok(())
}

#[test]
fn zero_page_size_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_page_size = 0;
    assert_invalid(config.validate(), "max_page_size")?;
    Ok(())
}

#[test]
fn oversized_page_size_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_page_size = 20_000;
    assert_invalid(config.validate(), "max_page_size")?;
    Ok(())
}
