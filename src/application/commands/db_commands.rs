// src/application/commands/db_commands.rs
//
// Database Maintenance Command Handlers

use std::collections::BTreeMap;

use crate::application::{dto::*, error_handling::CommandResult, state::AppState};
use crate::db::{get_connection, get_database_stats, table_info, verify_database_integrity};

pub fn database_stats(state: &AppState) -> CommandResult<DatabaseStatsDto> {
    let conn = get_connection(&state.pool)?;
    let stats = get_database_stats(&conn)?;
    Ok(DatabaseStatsDto::from(stats))
}

/// `PRAGMA integrity_check`; returns "ok" on success
pub fn check_database(state: &AppState) -> CommandResult<String> {
    let conn = get_connection(&state.pool)?;
    verify_database_integrity(&conn)?;
    Ok("ok".to_string())
}

pub fn list_tables(state: &AppState) -> CommandResult<BTreeMap<String, Vec<ColumnDto>>> {
    let conn = get_connection(&state.pool)?;
    let tables = table_info(&conn)?;

    Ok(tables
        .into_iter()
        .map(|(table, columns)| (table, columns.into_iter().map(ColumnDto::from).collect()))
        .collect())
}

pub fn export_data(state: &AppState) -> CommandResult<ExportDto> {
    let data = state.data_service.export_all()?;
    Ok(ExportDto::from(data))
}

pub fn clear_data(state: &AppState) -> CommandResult<()> {
    state.data_service.clear_all()?;
    Ok(())
}

pub fn seed_demo_data(state: &AppState) -> CommandResult<SeedDto> {
    let seed = state.data_service.seed_demo_data()?;
    Ok(SeedDto::from(seed))
}
