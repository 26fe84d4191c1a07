//! Config defaults and validation tests for toner-stock-config.
// toner-stock-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate defaults, server, store, and audit constraints.
// Purpose: Ensure minimal config is valid and invariants fail closed.
// =============================================================================

use std::path::PathBuf;

use toner_stock_config::StoreType;

mod common;

use common::TestResult;
use common::assert_invalid;

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn defaults_bind_loopback_with_memory_store_and_audit_on() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.server.bind != "127.0.0.1:8080" {
        return Err(format!("unexpected default bind {}", config.server.bind));
    }
    if config.server.max_body_bytes != 64 * 1024 {
        return Err("server.max_body_bytes should default to 64 KiB".to_string());
    }
    if config.store.store_type != StoreType::Memory {
        return Err("store should default to memory".to_string());
    }
    if config.store.sqlite_config().is_some() {
        return Err("memory store should not yield sqlite settings".to_string());
    }
    if !config.audit.enabled {
        return Err("audit should default to enabled".to_string());
    }
    Ok(())
}

#[test]
fn server_rejects_zero_body_limit() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "server.max_body_bytes must be greater than zero")
}

#[test]
fn server_rejects_unparseable_bind() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "localhost".to_string();
    assert_invalid(config.validate(), "invalid server.bind address")
}

#[test]
fn server_rejects_non_loopback_without_opt_in() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "0.0.0.0:8080".to_string();
    assert_invalid(config.validate(), "allow_non_loopback")?;
    config.server.allow_non_loopback = true;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn memory_store_rejects_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.path = Some(PathBuf::from("toners.sqlite"));
    assert_invalid(config.validate(), "memory store must not set path")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    assert_invalid(config.validate(), "sqlite store requires path")
}

#[test]
fn sqlite_store_section_parses_tuning() -> TestResult {
    let config = common::config_from_toml(
        r#"
[store]
type = "sqlite"
path = "data/toners.sqlite"
busy_timeout_ms = 250
journal_mode = "delete"
sync_mode = "normal"
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    let sqlite = config.store.sqlite_config().ok_or("expected sqlite settings")?;
    if sqlite.path != PathBuf::from("data/toners.sqlite") || sqlite.busy_timeout_ms != 250 {
        return Err("sqlite path or busy timeout was not applied".to_string());
    }
    if sqlite.journal_mode.pragma_value() != "delete" || sqlite.sync_mode.pragma_value() != "normal"
    {
        return Err("journal/sync modes were not applied".to_string());
    }
    Ok(())
}

#[test]
fn audit_rejects_blank_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.path = Some("   ".to_string());
    assert_invalid(config.validate(), "audit.path must be non-empty")
}

#[test]
fn unknown_fields_fail_to_parse() -> TestResult {
    match common::config_from_toml("[server]\nport = 8080\n") {
        Ok(_) => Err("unknown server field should be rejected".to_string()),
        Err(_) => Ok(()),
    }
}

#[test]
fn sqlite_store_caps_body_limit_at_document_size() -> TestResult {
    let mut config = common::config_from_toml(
        r#"
[server]
max_body_bytes = 1048576

[store]
type = "sqlite"
path = "data/toners.sqlite"
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "with the sqlite store")?;
    config.server.max_body_bytes = toner_stock_store_sqlite::MAX_DOCUMENT_BYTES;
    config.validate().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 1_048_576;
    config.store.store_type = StoreType::Memory;
    config.store.path = None;
    config.validate().map_err(|err| err.to_string())
}
