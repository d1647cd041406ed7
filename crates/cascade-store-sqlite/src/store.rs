// crates/cascade-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Directory Store
// Description: Durable DirectoryStore backed by SQLite WAL.
// Purpose: Persist directory records as JSON documents with integrity checks.
// Dependencies: cascade-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each directory record is stored as one JSON document row keyed by tenant
//! and identifier; list columns (`fiscal_year_id`, `kpi_id`) are duplicated
//! out of the document for indexed scoping. The schema version is gated via
//! `user_version` and the store fails closed on databases written by a
//! newer schema. Confirmation rows carry the canonical structure digest and
//! verify it on every load. Database contents are untrusted on read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use cascade_core::ComponentId;
use cascade_core::DEFAULT_HASH_ALGORITHM;
use cascade_core::DirectoryStore;
use cascade_core::FiscalYear;
use cascade_core::FiscalYearId;
use cascade_core::FiscalYearStatus;
use cascade_core::Kpi;
use cascade_core::KpiId;
use cascade_core::KpiObjective;
use cascade_core::LevelDefinition;
use cascade_core::LevelId;
use cascade_core::ObjectiveId;
use cascade_core::OrgUnit;
use cascade_core::OrgUnitId;
use cascade_core::PerformanceComponent;
use cascade_core::Perspective;
use cascade_core::PerspectiveId;
use cascade_core::StoreError;
use cascade_core::StructureConfirmation;
use cascade_core::Tenant;
use cascade_core::TenantId;
use cascade_core::hashing::hash_bytes;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// SQLite schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum JSON document size accepted by the store.
pub const MAX_DOCUMENT_BYTES: usize = 1_048_576;

/// Table creation statements, executed once when the schema is installed.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS tenants (
    tenant_id INTEGER PRIMARY KEY,
    doc TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS levels (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE TABLE IF NOT EXISTS perspectives (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE TABLE IF NOT EXISTS fiscal_years (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE TABLE IF NOT EXISTS org_units (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    fiscal_year_id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE INDEX IF NOT EXISTS org_units_by_year ON org_units (tenant_id, fiscal_year_id);
CREATE TABLE IF NOT EXISTS components (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    fiscal_year_id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE INDEX IF NOT EXISTS components_by_year ON components (tenant_id, fiscal_year_id);
CREATE TABLE IF NOT EXISTS kpis (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    fiscal_year_id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE INDEX IF NOT EXISTS kpis_by_year ON kpis (tenant_id, fiscal_year_id);
CREATE TABLE IF NOT EXISTS objectives (
    tenant_id INTEGER NOT NULL,
    id TEXT NOT NULL,
    kpi_id TEXT NOT NULL,
    doc TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
);
CREATE INDEX IF NOT EXISTS objectives_by_kpi ON objectives (tenant_id, kpi_id);
CREATE TABLE IF NOT EXISTS confirmations (
    tenant_id INTEGER NOT NULL,
    fiscal_year_id TEXT NOT NULL,
    doc TEXT NOT NULL,
    doc_hash TEXT NOT NULL,
    PRIMARY KEY (tenant_id, fiscal_year_id)
);
";

// ============================================================================
// SECTION: Config
// ============================================================================

/// SQLite journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to SQLite `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the pragma value for the mode.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "WAL",
            Self::Delete => "DELETE",
        }
    }
}

/// SQLite synchronous mode configuration.
///
/// # Invariants
/// - Values map 1:1 to SQLite `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full durability (recommended).
    #[default]
    Full,
    /// Normal durability.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the pragma value for the mode.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Normal => "NORMAL",
        }
    }
}

/// SQLite store configuration.
///
/// # Invariants
/// - `path` names the database file; parent directories must exist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// Synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl SqliteStoreConfig {
    /// Creates a config with default pragmas for the provided path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Default busy timeout (ms).
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Errors produced by the SQLite directory store.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Database could not be opened.
    #[error("sqlite open failed: {0}")]
    Open(String),
    /// Pragma configuration failed.
    #[error("sqlite pragma failed: {0}")]
    Pragma(String),
    /// Database was written by an unsupported schema version.
    #[error("sqlite schema version {found} unsupported (expected {expected})")]
    SchemaVersion {
        /// Version found in the database.
        found: i64,
        /// Newest version this build supports.
        expected: i64,
    },
    /// SQL statement failed.
    #[error("sqlite statement failed: {0}")]
    Sql(String),
    /// Record failed to serialize or deserialize.
    #[error("record serialization failed: {0}")]
    Serialization(String),
    /// Stored record failed integrity verification.
    #[error("record integrity failure: {0}")]
    Integrity(String),
    /// Record exceeds the document size cap.
    #[error("record exceeds {MAX_DOCUMENT_BYTES} bytes: {0}")]
    DocumentTooLarge(String),
    /// Store mutex was poisoned.
    #[error("sqlite store lock poisoned")]
    LockPoisoned,
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Serialization(message) => Self::Serialization(message),
            SqliteStoreError::Integrity(message) => Self::Integrity(message),
            SqliteStoreError::DocumentTooLarge(message) => Self::CapacityExceeded(message),
            other => Self::Backend(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: SQLite Store
// ============================================================================

/// Durable directory store backed by SQLite.
///
/// # Invariants
/// - One mutex-guarded connection; operations are serialized per store.
/// - All reads treat database contents as untrusted and fail closed.
#[derive(Debug)]
pub struct SqliteDirectoryStore {
    /// Guarded database connection.
    connection: Mutex<Connection>,
}

impl SqliteDirectoryStore {
    /// Opens (and, if needed, initializes) a store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened,
    /// configured, or carries an unsupported schema version.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Locks the connection, failing closed on poisoning.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::LockPoisoned)
    }
}

// ============================================================================
// SECTION: Connection Setup
// ============================================================================

/// Opens an SQLite connection with durable defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Open(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies SQLite pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Pragma(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Pragma(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Pragma(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Pragma(err.to_string()))?;
    Ok(())
}

/// Initializes the schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection
        .transaction()
        .map_err(|err| SqliteStoreError::Sql(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Sql(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", [], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Sql(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Sql(err.to_string()))?;
            tx.execute_batch(SCHEMA_SQL)
                .map_err(|err| SqliteStoreError::Sql(err.to_string()))?;
        }
        Some(found) if found == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SqliteStoreError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            });
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Sql(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: Document Helpers
// ============================================================================

/// Serializes a record into a size-checked JSON document.
fn encode_document<T: Serialize>(label: &str, record: &T) -> Result<String, SqliteStoreError> {
    let doc = serde_json::to_string(record)
        .map_err(|err| SqliteStoreError::Serialization(err.to_string()))?;
    if doc.len() > MAX_DOCUMENT_BYTES {
        return Err(SqliteStoreError::DocumentTooLarge(label.to_string()));
    }
    Ok(doc)
}

/// Deserializes a JSON document into a record.
fn decode_document<T: DeserializeOwned>(label: &str, doc: &str) -> Result<T, SqliteStoreError> {
    serde_json::from_str(doc)
        .map_err(|err| SqliteStoreError::Serialization(format!("{label}: {err}")))
}

/// Computes the stored digest for a confirmation document.
fn confirmation_digest(doc: &str) -> String {
    hash_bytes(DEFAULT_HASH_ALGORITHM, doc.as_bytes()).value
}

/// Maps a rusqlite error, routing constraint conflicts to [`StoreError::Conflict`].
fn map_sql_error(context: &str, error: &rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = error {
        if failure.code == ErrorCode::ConstraintViolation {
            return StoreError::Conflict(context.to_string());
        }
    }
    StoreError::Backend(format!("{context}: {error}"))
}

// ============================================================================
// SECTION: DirectoryStore Implementation
// ============================================================================

impl DirectoryStore for SqliteDirectoryStore {
    fn put_tenant(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let doc = encode_document("tenant", tenant)?;
        let connection = self.lock()?;
        connection
            .execute(
                "INSERT INTO tenants (tenant_id, doc) VALUES (?1, ?2)
                 ON CONFLICT (tenant_id) DO UPDATE SET doc = excluded.doc",
                params![i64::try_from(tenant.id.get()).unwrap_or(i64::MAX), doc],
            )
            .map_err(|err| map_sql_error("put tenant", &err))?;
        Ok(())
    }

    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        let connection = self.lock()?;
        let doc: Option<String> = connection
            .query_row(
                "SELECT doc FROM tenants WHERE tenant_id = ?1",
                params![i64::try_from(id.get()).unwrap_or(i64::MAX)],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| map_sql_error("load tenant", &err))?;
        doc.map(|doc| decode_document("tenant", &doc).map_err(StoreError::from))
            .transpose()
    }

    fn tenants(&self) -> Result<Vec<Tenant>, StoreError> {
        let connection = self.lock()?;
        let mut statement = connection
            .prepare("SELECT doc FROM tenants ORDER BY tenant_id")
            .map_err(|err| map_sql_error("list tenants", &err))?;
        let rows = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|err| map_sql_error("list tenants", &err))?;
        let mut records = Vec::new();
        for row in rows {
            let doc = row.map_err(|err| map_sql_error("list tenants", &err))?;
            records.push(decode_document("tenant", &doc)?);
        }
        Ok(records)
    }

    fn delete_tenant(&self, id: TenantId) -> Result<(), StoreError> {
        let connection = self.lock()?;
        let affected = connection
            .execute(
                "DELETE FROM tenants WHERE tenant_id = ?1",
                params![i64::try_from(id.get()).unwrap_or(i64::MAX)],
            )
            .map_err(|err| map_sql_error("delete tenant", &err))?;
        if affected == 0 {
            return Err(StoreError::NotFound(format!("tenant {id}")));
        }
        Ok(())
    }

    fn put_level(&self, level: &LevelDefinition) -> Result<(), StoreError> {
        self.put_scoped("levels", "level", level.tenant_id, level.id.as_str(), level)
    }

    fn level(&self, tenant: TenantId, id: &LevelId) -> Result<Option<LevelDefinition>, StoreError> {
        self.get_scoped("levels", "level", tenant, id.as_str())
    }

    fn levels(&self, tenant: TenantId) -> Result<Vec<LevelDefinition>, StoreError> {
        self.list_scoped("levels", "level", tenant)
    }

    fn delete_level(&self, tenant: TenantId, id: &LevelId) -> Result<(), StoreError> {
        self.delete_scoped("levels", "level", tenant, id.as_str())
    }

    fn put_perspective(&self, perspective: &Perspective) -> Result<(), StoreError> {
        self.put_scoped(
            "perspectives",
            "perspective",
            perspective.tenant_id,
            perspective.id.as_str(),
            perspective,
        )
    }

    fn perspective(
        &self,
        tenant: TenantId,
        id: &PerspectiveId,
    ) -> Result<Option<Perspective>, StoreError> {
        self.get_scoped("perspectives", "perspective", tenant, id.as_str())
    }

    fn perspectives(&self, tenant: TenantId) -> Result<Vec<Perspective>, StoreError> {
        self.list_scoped("perspectives", "perspective", tenant)
    }

    fn delete_perspective(&self, tenant: TenantId, id: &PerspectiveId) -> Result<(), StoreError> {
        self.delete_scoped("perspectives", "perspective", tenant, id.as_str())
    }

    fn put_fiscal_year(&self, fiscal_year: &FiscalYear) -> Result<(), StoreError> {
        self.put_scoped(
            "fiscal_years",
            "fiscal year",
            fiscal_year.tenant_id,
            fiscal_year.id.as_str(),
            fiscal_year,
        )
    }

    fn fiscal_year(
        &self,
        tenant: TenantId,
        id: &FiscalYearId,
    ) -> Result<Option<FiscalYear>, StoreError> {
        self.get_scoped("fiscal_years", "fiscal year", tenant, id.as_str())
    }

    fn fiscal_years(&self, tenant: TenantId) -> Result<Vec<FiscalYear>, StoreError> {
        self.list_scoped("fiscal_years", "fiscal year", tenant)
    }

    fn set_fiscal_year_status(
        &self,
        tenant: TenantId,
        id: &FiscalYearId,
        status: FiscalYearStatus,
    ) -> Result<(), StoreError> {
        let mut fiscal_year: FiscalYear = self
            .get_scoped("fiscal_years", "fiscal year", tenant, id.as_str())?
            .ok_or_else(|| StoreError::NotFound(format!("fiscal year {id} for tenant {tenant}")))?;
        fiscal_year.status = status;
        self.put_scoped("fiscal_years", "fiscal year", tenant, id.as_str(), &fiscal_year)
    }

    fn put_org_unit(&self, unit: &OrgUnit) -> Result<(), StoreError> {
        self.put_year_scoped(
            "org_units",
            "org unit",
            unit.tenant_id,
            unit.id.as_str(),
            unit.fiscal_year_id.as_str(),
            unit,
        )
    }

    fn org_unit(&self, tenant: TenantId, id: &OrgUnitId) -> Result<Option<OrgUnit>, StoreError> {
        self.get_scoped("org_units", "org unit", tenant, id.as_str())
    }

    fn org_units(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Vec<OrgUnit>, StoreError> {
        self.list_year_scoped("org_units", "org unit", tenant, fiscal_year.as_str())
    }

    fn delete_org_unit(&self, tenant: TenantId, id: &OrgUnitId) -> Result<(), StoreError> {
        self.delete_scoped("org_units", "org unit", tenant, id.as_str())
    }

    fn put_component(&self, component: &PerformanceComponent) -> Result<(), StoreError> {
        self.put_year_scoped(
            "components",
            "component",
            component.tenant_id,
            component.id.as_str(),
            component.fiscal_year_id.as_str(),
            component,
        )
    }

    fn component(
        &self,
        tenant: TenantId,
        id: &ComponentId,
    ) -> Result<Option<PerformanceComponent>, StoreError> {
        self.get_scoped("components", "component", tenant, id.as_str())
    }

    fn components(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Vec<PerformanceComponent>, StoreError> {
        self.list_year_scoped("components", "component", tenant, fiscal_year.as_str())
    }

    fn delete_component(&self, tenant: TenantId, id: &ComponentId) -> Result<(), StoreError> {
        self.delete_scoped("components", "component", tenant, id.as_str())
    }

    fn put_kpi(&self, kpi: &Kpi) -> Result<(), StoreError> {
        self.put_year_scoped(
            "kpis",
            "kpi",
            kpi.tenant_id,
            kpi.id.as_str(),
            kpi.fiscal_year_id.as_str(),
            kpi,
        )
    }

    fn kpi(&self, tenant: TenantId, id: &KpiId) -> Result<Option<Kpi>, StoreError> {
        self.get_scoped("kpis", "kpi", tenant, id.as_str())
    }

    fn kpis(&self, tenant: TenantId, fiscal_year: &FiscalYearId) -> Result<Vec<Kpi>, StoreError> {
        self.list_year_scoped("kpis", "kpi", tenant, fiscal_year.as_str())
    }

    fn delete_kpi(&self, tenant: TenantId, id: &KpiId) -> Result<(), StoreError> {
        self.delete_scoped("kpis", "kpi", tenant, id.as_str())
    }

    fn put_objective(&self, objective: &KpiObjective) -> Result<(), StoreError> {
        let doc = encode_document("objective", objective)?;
        let connection = self.lock()?;
        connection
            .execute(
                "INSERT INTO objectives (tenant_id, id, kpi_id, doc) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (tenant_id, id) DO UPDATE
                 SET kpi_id = excluded.kpi_id, doc = excluded.doc",
                params![
                    i64::try_from(objective.tenant_id.get()).unwrap_or(i64::MAX),
                    objective.id.as_str(),
                    objective.kpi_id.as_str(),
                    doc
                ],
            )
            .map_err(|err| map_sql_error("put objective", &err))?;
        Ok(())
    }

    fn objective(
        &self,
        tenant: TenantId,
        id: &ObjectiveId,
    ) -> Result<Option<KpiObjective>, StoreError> {
        self.get_scoped("objectives", "objective", tenant, id.as_str())
    }

    fn objectives(&self, tenant: TenantId, kpi: &KpiId) -> Result<Vec<KpiObjective>, StoreError> {
        let connection = self.lock()?;
        let mut statement = connection
            .prepare(
                "SELECT doc FROM objectives WHERE tenant_id = ?1 AND kpi_id = ?2 ORDER BY id",
            )
            .map_err(|err| map_sql_error("list objectives", &err))?;
        let rows = statement
            .query_map(
                params![i64::try_from(tenant.get()).unwrap_or(i64::MAX), kpi.as_str()],
                |row| row.get::<_, String>(0),
            )
            .map_err(|err| map_sql_error("list objectives", &err))?;
        let mut records = Vec::new();
        for row in rows {
            let doc = row.map_err(|err| map_sql_error("list objectives", &err))?;
            records.push(decode_document("objective", &doc)?);
        }
        Ok(records)
    }

    fn delete_objective(&self, tenant: TenantId, id: &ObjectiveId) -> Result<(), StoreError> {
        self.delete_scoped("objectives", "objective", tenant, id.as_str())
    }

    fn insert_confirmation(&self, confirmation: &StructureConfirmation) -> Result<(), StoreError> {
        let doc = encode_document("confirmation", confirmation)?;
        let digest = confirmation_digest(&doc);
        let connection = self.lock()?;
        connection
            .execute(
                "INSERT INTO confirmations (tenant_id, fiscal_year_id, doc, doc_hash)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    i64::try_from(confirmation.tenant_id.get()).unwrap_or(i64::MAX),
                    confirmation.fiscal_year_id.as_str(),
                    doc,
                    digest
                ],
            )
            .map_err(|err| {
                map_sql_error(
                    &format!("fiscal year {} already confirmed", confirmation.fiscal_year_id),
                    &err,
                )
            })?;
        Ok(())
    }

    fn confirmation(
        &self,
        tenant: TenantId,
        fiscal_year: &FiscalYearId,
    ) -> Result<Option<StructureConfirmation>, StoreError> {
        let connection = self.lock()?;
        let row: Option<(String, String)> = connection
            .query_row(
                "SELECT doc, doc_hash FROM confirmations
                 WHERE tenant_id = ?1 AND fiscal_year_id = ?2",
                params![
                    i64::try_from(tenant.get()).unwrap_or(i64::MAX),
                    fiscal_year.as_str()
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|err| map_sql_error("load confirmation", &err))?;
        let Some((doc, stored_digest)) = row else {
            return Ok(None);
        };
        if confirmation_digest(&doc) != stored_digest {
            return Err(StoreError::Integrity(format!(
                "confirmation for fiscal year {fiscal_year} failed digest verification"
            )));
        }
        Ok(Some(decode_document("confirmation", &doc)?))
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let connection = self.lock()?;
        connection
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|err| map_sql_error("readiness probe", &err))
    }
}

// ============================================================================
// SECTION: Scoped Row Helpers
// ============================================================================

impl SqliteDirectoryStore {
    /// Upserts a `(tenant_id, id, doc)` row.
    fn put_scoped<T: Serialize>(
        &self,
        table: &str,
        label: &str,
        tenant: TenantId,
        id: &str,
        record: &T,
    ) -> Result<(), StoreError> {
        let doc = encode_document(label, record)?;
        let connection = self.lock()?;
        let sql = format!(
            "INSERT INTO {table} (tenant_id, id, doc) VALUES (?1, ?2, ?3)
             ON CONFLICT (tenant_id, id) DO UPDATE SET doc = excluded.doc"
        );
        connection
            .execute(
                &sql,
                params![i64::try_from(tenant.get()).unwrap_or(i64::MAX), id, doc],
            )
            .map_err(|err| map_sql_error(&format!("put {label}"), &err))?;
        Ok(())
    }

    /// Upserts a `(tenant_id, id, fiscal_year_id, doc)` row.
    fn put_year_scoped<T: Serialize>(
        &self,
        table: &str,
        label: &str,
        tenant: TenantId,
        id: &str,
        fiscal_year: &str,
        record: &T,
    ) -> Result<(), StoreError> {
        let doc = encode_document(label, record)?;
        let connection = self.lock()?;
        let sql = format!(
            "INSERT INTO {table} (tenant_id, id, fiscal_year_id, doc) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (tenant_id, id) DO UPDATE
             SET fiscal_year_id = excluded.fiscal_year_id, doc = excluded.doc"
        );
        connection
            .execute(
                &sql,
                params![
                    i64::try_from(tenant.get()).unwrap_or(i64::MAX),
                    id,
                    fiscal_year,
                    doc
                ],
            )
            .map_err(|err| map_sql_error(&format!("put {label}"), &err))?;
        Ok(())
    }

    /// Loads one row by tenant and identifier.
    fn get_scoped<T: DeserializeOwned>(
        &self,
        table: &str,
        label: &str,
        tenant: TenantId,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let connection = self.lock()?;
        let sql = format!("SELECT doc FROM {table} WHERE tenant_id = ?1 AND id = ?2");
        let doc: Option<String> = connection
            .query_row(
                &sql,
                params![i64::try_from(tenant.get()).unwrap_or(i64::MAX), id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| map_sql_error(&format!("load {label}"), &err))?;
        doc.map(|doc| decode_document(label, &doc).map_err(StoreError::from))
            .transpose()
    }

    /// Lists rows for one tenant, ordered by identifier.
    fn list_scoped<T: DeserializeOwned>(
        &self,
        table: &str,
        label: &str,
        tenant: TenantId,
    ) -> Result<Vec<T>, StoreError> {
        let connection = self.lock()?;
        let sql = format!("SELECT doc FROM {table} WHERE tenant_id = ?1 ORDER BY id");
        let mut statement = connection
            .prepare(&sql)
            .map_err(|err| map_sql_error(&format!("list {label}"), &err))?;
        let rows = statement
            .query_map(
                params![i64::try_from(tenant.get()).unwrap_or(i64::MAX)],
                |row| row.get::<_, String>(0),
            )
            .map_err(|err| map_sql_error(&format!("list {label}"), &err))?;
        let mut records = Vec::new();
        for row in rows {
            let doc = row.map_err(|err| map_sql_error(&format!("list {label}"), &err))?;
            records.push(decode_document(label, &doc)?);
        }
        Ok(records)
    }

    /// Lists rows for one tenant and fiscal year, ordered by identifier.
    fn list_year_scoped<T: DeserializeOwned>(
        &self,
        table: &str,
        label: &str,
        tenant: TenantId,
        fiscal_year: &str,
    ) -> Result<Vec<T>, StoreError> {
        let connection = self.lock()?;
        let sql = format!(
            "SELECT doc FROM {table} WHERE tenant_id = ?1 AND fiscal_year_id = ?2 ORDER BY id"
        );
        let mut statement = connection
            .prepare(&sql)
            .map_err(|err| map_sql_error(&format!("list {label}"), &err))?;
        let rows = statement
            .query_map(
                params![i64::try_from(tenant.get()).unwrap_or(i64::MAX), fiscal_year],
                |row| row.get::<_, String>(0),
            )
            .map_err(|err| map_sql_error(&format!("list {label}"), &err))?;
        let mut records = Vec::new();
        for row in rows {
            let doc = row.map_err(|err| map_sql_error(&format!("list {label}"), &err))?;
            records.push(decode_document(label, &doc)?);
        }
        Ok(records)
    }

    /// Deletes one row by tenant and identifier.
    fn delete_scoped(
        &self,
        table: &str,
        label: &str,
        tenant: TenantId,
        id: &str,
    ) -> Result<(), StoreError> {
        let connection = self.lock()?;
        let sql = format!("DELETE FROM {table} WHERE tenant_id = ?1 AND id = ?2");
        let affected = connection
            .execute(
                &sql,
                params![i64::try_from(tenant.get()).unwrap_or(i64::MAX), id],
            )
            .map_err(|err| map_sql_error(&format!("delete {label}"), &err))?;
        if affected == 0 {
            return Err(StoreError::NotFound(format!("{label} {id} for tenant {tenant}")));
        }
        Ok(())
    }
}

