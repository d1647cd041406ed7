// crates/cascade-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared fixtures for config validation tests.
// Purpose: Provide a minimal valid configuration to mutate per test.
// =============================================================================

//! Shared config test helpers.

use cascade_config::CascadeConfig;
use cascade_config::ConfigError;

/// Returns a minimal configuration that validates cleanly.
pub fn minimal_config() -> Result<CascadeConfig, ConfigError> {
    let config = CascadeConfig::default();
    config.validate()?;
    Ok(config)
}
