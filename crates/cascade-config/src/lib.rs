// crates/cascade-config/src/lib.rs
// ============================================================================
// Module: Cascade Configuration
// Description: TOML configuration with strict fail-closed validation.
// Purpose: Load and validate server, store, and limit settings.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Cascade loads one TOML file into [`CascadeConfig`]. Loading is hardened
//! (path length, file size cap, UTF-8 only) and every section validates
//! fail-closed: a config that loads but does not validate never reaches
//! the server. Defaults are loopback-only and memory-backed so a bare
//! `cascade serve` cannot expose anything by accident.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum config file size in bytes.
pub const MAX_CONFIG_BYTES: usize = 1_048_576;
/// Maximum total config path length.
pub const MAX_PATH_LENGTH: usize = 4_096;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum request body size the server section accepts.
pub const MAX_BODY_BYTES_CEILING: usize = 8 * 1_048_576;
/// Maximum request timeout the server section accepts.
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 300_000;
/// Maximum busy timeout the store section accepts.
pub const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Maximum page size the limits section accepts.
pub const MAX_PAGE_SIZE_CEILING: usize = 10_000;

// ============================================================================
// SECTION: Config Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config path exceeds the length cap.
    #[error("config path exceeds max length {MAX_PATH_LENGTH}")]
    PathTooLong,
    /// A config path component exceeds the component cap.
    #[error("config path component too long (max {MAX_PATH_COMPONENT_LENGTH})")]
    PathComponentTooLong,
    /// Config file could not be read.
    #[error("config file read failed: {0}")]
    Read(String),
    /// Config file exceeds the size cap.
    #[error("config file exceeds size limit {MAX_CONFIG_BYTES}")]
    FileTooLarge,
    /// Config file is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// TOML parsing failed.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// Server bind address is not a socket address.
    #[error("server bind is not a socket address: {0}")]
    BadBind(String),
    /// Non-loopback bind without the explicit allow flag.
    #[error("non-loopback bind disallowed without allow_non_loopback")]
    NonLoopbackBind,
    /// Request body cap is outside `1..=8 MiB`.
    #[error("server max_body_bytes must be within 1..={MAX_BODY_BYTES_CEILING}")]
    BadBodyCap,
    /// Request timeout is outside `1..=300_000` ms.
    #[error("server request_timeout_ms must be within 1..={MAX_REQUEST_TIMEOUT_MS}")]
    BadRequestTimeout,
    /// SQLite backend configured without a store path.
    #[error("sqlite backend requires store path")]
    MissingStorePath,
    /// Memory backend configured with a store path.
    #[error("memory backend does not take a store path")]
    UnexpectedStorePath,
    /// Busy timeout is outside `1..=60_000` ms.
    #[error("store busy_timeout_ms must be within 1..={MAX_BUSY_TIMEOUT_MS}")]
    BadBusyTimeout,
    /// A limit value is zero.
    #[error("limits.{0} must be >= 1")]
    ZeroLimit(&'static str),
    /// Page size cap exceeds the ceiling.
    #[error("limits.max_page_size must be within 1..={MAX_PAGE_SIZE_CEILING}")]
    BadPageSize,
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// HTTP server settings.
///
/// # Invariants
/// - `bind` parses as a socket address.
/// - Non-loopback binds require `allow_non_loopback`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address, host:port.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Explicit opt-in for non-loopback binds.
    #[serde(default)]
    pub allow_non_loopback: bool,
    /// Request body cap in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allow_non_loopback: false,
            max_body_bytes: default_max_body_bytes(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServerConfig {
    /// Validates server settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let addr: SocketAddr = self
            .bind
            .parse()
            .map_err(|_| ConfigError::BadBind(self.bind.clone()))?;
        if !addr.ip().is_loopback() && !self.allow_non_loopback {
            return Err(ConfigError::NonLoopbackBind);
        }
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BODY_BYTES_CEILING {
            return Err(ConfigError::BadBodyCap);
        }
        if self.request_timeout_ms == 0 || self.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS {
            return Err(ConfigError::BadRequestTimeout);
        }
        Ok(())
    }
}

/// Default bind address (loopback).
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Default request body cap (1 MiB).
const fn default_max_body_bytes() -> usize {
    1_048_576
}

/// Default request timeout (30 s).
const fn default_request_timeout_ms() -> u64 {
    30_000
}

// ============================================================================
// SECTION: Store Config
// ============================================================================

/// Directory store backends.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-memory store (non-durable).
    #[default]
    Memory,
    /// SQLite-backed durable store.
    Sqlite,
}

/// SQLite journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to SQLite `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

/// SQLite synchronous mode configuration.
///
/// # Invariants
/// - Values map 1:1 to SQLite `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreSyncMode {
    /// Full durability (recommended).
    #[default]
    Full,
    /// Normal durability.
    Normal,
}

/// Directory store settings.
///
/// # Invariants
/// - `path` is required for the sqlite backend and rejected for memory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database path for the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// SQLite journal mode.
    #[serde(default)]
    pub journal_mode: StoreJournalMode,
    /// SQLite synchronous mode.
    #[serde(default)]
    pub sync_mode: StoreSyncMode,
    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            journal_mode: StoreJournalMode::default(),
            sync_mode: StoreSyncMode::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Validates store settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.backend, &self.path) {
            (StoreBackend::Sqlite, None) => return Err(ConfigError::MissingStorePath),
            (StoreBackend::Memory, Some(_)) => return Err(ConfigError::UnexpectedStorePath),
            _ => {}
        }
        if self.busy_timeout_ms == 0 || self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::BadBusyTimeout);
        }
        Ok(())
    }
}

/// Default SQLite busy timeout (5 s).
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Limits Config
// ============================================================================

/// Directory size and paging limits.
///
/// # Invariants
/// - All limits are >= 1; `max_page_size` is additionally capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum org units per fiscal year.
    #[serde(default = "default_max_units")]
    pub max_units_per_fiscal_year: usize,
    /// Maximum performance components per fiscal year.
    #[serde(default = "default_max_components")]
    pub max_components_per_fiscal_year: usize,
    /// Maximum page size for list endpoints.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_units_per_fiscal_year: default_max_units(),
            max_components_per_fiscal_year: default_max_components(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_units_per_fiscal_year == 0 {
            return Err(ConfigError::ZeroLimit("max_units_per_fiscal_year"));
        }
        if self.max_components_per_fiscal_year == 0 {
            return Err(ConfigError::ZeroLimit("max_components_per_fiscal_year"));
        }
        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_SIZE_CEILING {
            return Err(ConfigError::BadPageSize);
        }
        Ok(())
    }
}

/// Default unit cap per fiscal year.
const fn default_max_units() -> usize {
    10_000
}

/// Default component cap per fiscal year.
const fn default_max_components() -> usize {
    50_000
}

/// Default list page size cap.
const fn default_max_page_size() -> usize {
    500
}

// ============================================================================
// SECTION: Cascade Config
// ============================================================================

/// Top-level Cascade configuration.
///
/// # Invariants
/// - Defaults validate cleanly; a missing config file is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CascadeConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Size and paging limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl CascadeConfig {
    /// Loads configuration from an optional TOML file.
    ///
    /// `None` yields validated defaults. Loading guards the path length,
    /// component length, file size, and encoding before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, parsing, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        check_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Read(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::FileTooLarge);
        }
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        let config: Self = toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Returns a commented sample configuration.
    #[must_use]
    pub const fn sample_toml() -> &'static str {
        SAMPLE_CONFIG
    }
}

/// Guards a config path before any filesystem access.
fn check_path(path: &Path) -> Result<(), ConfigError> {
    let raw = path.as_os_str();
    if raw.len() > MAX_PATH_LENGTH {
        return Err(ConfigError::PathTooLong);
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::PathComponentTooLong);
        }
    }
    Ok(())
}

/// Commented sample configuration emitted by `cascade config sample`.
const SAMPLE_CONFIG: &str = r#"# Cascade sample configuration.
# Every key is optional; defaults are loopback-only and memory-backed.

[server]
# Bind address. Non-loopback binds require allow_non_loopback = true.
bind = "127.0.0.1:8080"
allow_non_loopback = false
# Request body cap in bytes (1..=8388608).
max_body_bytes = 1048576
# Per-request timeout in milliseconds.
request_timeout_ms = 30000

[store]
# "memory" (non-durable) or "sqlite".
backend = "memory"
# Required for the sqlite backend.
# path = "/var/lib/cascade/directory.db"
# journal_mode = "wal"      # or "delete"
# sync_mode = "full"        # or "normal"
busy_timeout_ms = 5000

[limits]
max_units_per_fiscal_year = 10000
max_components_per_fiscal_year = 50000
max_page_size = 500
"#;
