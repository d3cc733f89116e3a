// src/application/commands/user_commands.rs
//
// User Command Handlers

use crate::application::{dto::*, error_handling::CommandResult, state::AppState};
use crate::domain::UserChanges;
use crate::services::{RegisterUserRequest, UpdateUserRequest};

/// Register a local user without a cloud identity
pub fn create_user(state: &AppState, email: String, nombre: String) -> CommandResult<UserDto> {
    let user = state.user_service.register_user(RegisterUserRequest {
        email,
        nombre,
        firebase_uid: None,
    })?;

    Ok(UserDto::from(user))
}

pub fn get_user(state: &AppState, usuario_id: i64) -> CommandResult<Option<UserDto>> {
    let user = state.user_service.get_user(usuario_id)?;
    Ok(user.map(UserDto::from))
}

pub fn list_users(state: &AppState) -> CommandResult<Vec<UserDto>> {
    let users = state.user_service.list_users()?;
    Ok(users.into_iter().map(UserDto::from).collect())
}

pub fn update_user(state: &AppState, dto: UpdateUserDto) -> CommandResult<UserDto> {
    let user = state.user_service.update_user(UpdateUserRequest {
        usuario_id: dto.usuario_id,
        changes: UserChanges {
            email: dto.email.map(|e| e.trim().to_string()),
            nombre: dto.nombre.map(|n| n.trim().to_string()),
            firebase_uid: None,
        },
    })?;

    Ok(UserDto::from(user))
}

pub fn delete_user(state: &AppState, usuario_id: i64) -> CommandResult<()> {
    state.user_service.delete_user(usuario_id)?;
    Ok(())
}
