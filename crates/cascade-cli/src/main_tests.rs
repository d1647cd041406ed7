// crates/cascade-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Argument parsing and snapshot handling tests.
// Purpose: Validate command shapes and offline input guards.
// ============================================================================

//! CLI parsing and snapshot tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::io::Write;
use std::path::Path;

use cascade_core::KpiId;
use cascade_core::runtime::resolve_perspective;
use cascade_core::runtime::validate_structure;
use clap::Parser;
use tempfile::NamedTempFile;

use crate::Cli;
use crate::Command;
use crate::ConfigCommand;
use crate::KpiCommand;
use crate::StructureCommand;
use crate::snapshot::SnapshotError;
use crate::snapshot::load_cascade;
use crate::snapshot::load_structure;

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

#[test]
fn serve_parses_with_and_without_config() {
    let cli = Cli::try_parse_from(["cascade", "serve"]).unwrap();
    assert!(matches!(cli.command, Command::Serve { config: None }));

    let cli = Cli::try_parse_from(["cascade", "serve", "--config", "/etc/cascade.toml"]).unwrap();
    assert!(matches!(cli.command, Command::Serve { config: Some(_) }));
}

#[test]
fn structure_check_requires_input() {
    assert!(Cli::try_parse_from(["cascade", "structure", "check"]).is_err());
    let cli =
        Cli::try_parse_from(["cascade", "structure", "check", "--input", "units.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Structure {
            command: StructureCommand::Check { .. }
        }
    ));
}

#[test]
fn kpi_resolve_requires_input_and_kpi() {
    assert!(Cli::try_parse_from(["cascade", "kpi", "resolve", "--input", "c.json"]).is_err());
    let cli = Cli::try_parse_from([
        "cascade", "kpi", "resolve", "--input", "c.json", "--kpi", "leaf",
    ])
    .unwrap();
    let Command::Kpi {
        command: KpiCommand::Resolve { kpi, .. },
    } = cli.command
    else {
        panic!("expected kpi resolve command");
    };
    assert_eq!(kpi, "leaf");
}

#[test]
fn config_subcommands_parse() {
    let cli = Cli::try_parse_from(["cascade", "config", "sample"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Config {
            command: ConfigCommand::Sample
        }
    ));
    let cli =
        Cli::try_parse_from(["cascade", "config", "validate", "--config", "c.toml"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Config {
            command: ConfigCommand::Validate { .. }
        }
    ));
}

// ============================================================================
// SECTION: Snapshot Guards
// ============================================================================

#[test]
fn structure_snapshot_rejects_long_paths() {
    let long = "a".repeat(5_000);
    let err = load_structure(Path::new(&long)).unwrap_err();
    assert!(matches!(err, SnapshotError::PathTooLong));
}

#[test]
fn structure_snapshot_rejects_unknown_fields() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "units": [], "mystery": true }"#).unwrap();
    let err = load_structure(file.path()).unwrap_err();
    assert!(matches!(err, SnapshotError::Parse(_)));
}

#[test]
fn structure_snapshot_loads_and_validates() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "units": [
                { "id": "org", "tenant_id": 1, "fiscal_year_id": "fy-2026",
                  "name": "org", "level_id": null, "parent_id": null, "active": true },
                { "id": "sales", "tenant_id": 1, "fiscal_year_id": "fy-2026",
                  "name": "sales", "level_id": null, "parent_id": "org", "active": true }
            ]
        }"#,
    )
    .unwrap();
    let snapshot = load_structure(file.path()).unwrap();
    let report = validate_structure(&snapshot.units, &snapshot.levels);
    assert!(report.is_valid());
    assert_eq!(report.unit_count, 2);
}

#[test]
fn cascade_snapshot_replays_into_a_resolvable_store() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "kpis": [
                { "id": "root", "tenant_id": 1, "fiscal_year_id": "fy-2026",
                  "org_unit_id": "org", "component_id": null,
                  "perspective_id": "p-financial", "name": "net revenue",
                  "unit": "EUR", "direction": "higher_is_better",
                  "baseline": "0", "target": "100" },
                { "id": "leaf", "tenant_id": 1, "fiscal_year_id": "fy-2026",
                  "org_unit_id": "org", "component_id": "comp-1",
                  "perspective_id": null, "name": "regional revenue",
                  "unit": "EUR", "direction": "higher_is_better",
                  "baseline": "0", "target": "100" }
            ],
            "components": [
                { "id": "comp-1", "tenant_id": 1, "fiscal_year_id": "fy-2026",
                  "org_unit_id": "org", "kind": "kpi",
                  "label": "cascaded revenue", "source_kpi_id": "root" }
            ],
            "perspectives": [
                { "id": "p-financial", "tenant_id": 1,
                  "name": "Financial", "description": null }
            ]
        }"#,
    )
    .unwrap();
    let snapshot = load_cascade(file.path()).unwrap();
    let tenant = snapshot.kpis[0].tenant_id;
    let store = snapshot.into_store().unwrap();
    let resolved = resolve_perspective(&store, tenant, &KpiId::new("leaf")).unwrap();
    assert_eq!(resolved.root_kpi_id, KpiId::new("root"));
    assert_eq!(resolved.depth, 1);
}
