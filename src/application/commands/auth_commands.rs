// src/application/commands/auth_commands.rs
//
// Auth Command Handlers
//
// RULES:
// - Tokens never leave the session file
// - Sign-out works offline

use crate::application::{dto::*, error_handling::CommandResult, state::AppState};
use crate::events::UserLoggedOut;
use crate::integrations::Credentials;
use crate::services::RegisterAccountRequest;

pub async fn register_account(state: &AppState, dto: RegisterAccountDto) -> CommandResult<SessionDto> {
    let session = state
        .auth_service()?
        .register(RegisterAccountRequest {
            credentials: Credentials::new(dto.email, dto.password),
            nombre: dto.nombre,
            universidad: dto.universidad,
            carrera: dto.carrera,
            semestre: dto.semestre,
        })
        .await?;

    Ok(SessionDto::from(session))
}

pub async fn login(state: &AppState, email: String, password: String) -> CommandResult<SessionDto> {
    let session = state
        .auth_service()?
        .login(Credentials::new(email, password))
        .await?;

    Ok(SessionDto::from(session))
}

/// Returns whether a session was active
pub fn logout(state: &AppState) -> CommandResult<bool> {
    let session = state.session_store().load()?;
    let cleared = state.session_store().clear()?;
    if let Some(session) = session {
        log::info!("User {} signed out", session.usuario_id);
        state.event_bus.emit(UserLoggedOut::new(session.usuario_id));
    }
    Ok(cleared)
}

pub async fn reset_password(state: &AppState, email: String) -> CommandResult<()> {
    state.auth_service()?.reset_password(&email).await?;
    Ok(())
}

pub fn whoami(state: &AppState) -> CommandResult<Option<SessionDto>> {
    let session = state.session_store().load()?;
    Ok(session.map(SessionDto::from))
}
