// src/application/commands/sync_commands.rs
//
// Sync Command Handlers

use std::collections::BTreeMap;

use crate::application::{dto::*, error_handling::CommandResult, state::AppState};

/// Row counts per table and sync status. Works without cloud settings.
pub fn sync_status(state: &AppState) -> CommandResult<BTreeMap<String, BTreeMap<String, i64>>> {
    let status = state.sync_status()?;

    Ok(status
        .into_iter()
        .map(|(table, counts)| {
            let counts = counts
                .into_iter()
                .map(|(status, n)| (status.to_string(), n))
                .collect();
            (table, counts)
        })
        .collect())
}

/// Push pending and errored rows to the configured cloud project
pub async fn sync_push(state: &AppState) -> CommandResult<SyncReportDto> {
    let report = state.sync_service()?.sync_pending().await?;
    Ok(SyncReportDto::from(report))
}
