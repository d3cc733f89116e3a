// src/services/user_service.rs
use std::sync::Arc;

use crate::domain::{validate_new_user, validate_user, NewUser, User, UserChanges};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, UserDeleted, UserRegistered, UserUpdated};
use crate::repositories::UserRepository;

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub nombre: String,
    pub firebase_uid: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub usuario_id: i64,
    pub changes: UserChanges,
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<EventBus>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            user_repo,
            event_bus,
        }
    }

    pub fn register_user(&self, request: RegisterUserRequest) -> AppResult<User> {
        let mut new_user = NewUser::new(request.email.trim(), request.nombre.trim());
        if let Some(uid) = request.firebase_uid {
            new_user = new_user.with_firebase_uid(uid);
        }

        validate_new_user(&new_user)?;

        if self.user_repo.get_by_email(&new_user.email)?.is_some() {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                new_user.email
            )));
        }

        let id = self.user_repo.insert(&new_user)?;
        let user = self
            .user_repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::not_found("User", id))?;

        log::info!("Registered user {} ({})", user.id, user.email);
        self.event_bus
            .emit(UserRegistered::new(user.id, user.email.clone()));

        Ok(user)
    }

    pub fn get_user(&self, usuario_id: i64) -> AppResult<Option<User>> {
        self.user_repo.get_by_id(usuario_id)
    }

    pub fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.user_repo.get_by_email(email.trim())
    }

    pub fn get_user_by_firebase_uid(&self, uid: &str) -> AppResult<Option<User>> {
        self.user_repo.get_by_firebase_uid(uid)
    }

    pub fn list_users(&self) -> AppResult<Vec<User>> {
        self.user_repo.list_all()
    }

    pub fn update_user(&self, request: UpdateUserRequest) -> AppResult<User> {
        let mut user = self
            .user_repo
            .get_by_id(request.usuario_id)?
            .ok_or_else(|| AppError::not_found("User", request.usuario_id))?;

        if request.changes.is_empty() {
            return Ok(user);
        }

        if let Some(email) = &request.changes.email {
            if email != &user.email {
                if let Some(other) = self.user_repo.get_by_email(email)? {
                    if other.id != user.id {
                        return Err(AppError::Conflict(format!(
                            "A user with email {} already exists",
                            email
                        )));
                    }
                }
            }
        }

        user.apply_changes(request.changes);
        validate_user(&user)?;
        self.user_repo.update(&user)?;

        self.event_bus.emit(UserUpdated::new(user.id));
        Ok(user)
    }

    /// Removes the user; subjects, grades and schedules go with it.
    pub fn delete_user(&self, usuario_id: i64) -> AppResult<()> {
        self.user_repo.delete(usuario_id)?;
        log::info!("Deleted user {}", usuario_id);
        self.event_bus.emit(UserDeleted::new(usuario_id));
        Ok(())
    }

    /// Find the local user for an authenticated identity, creating or linking
    /// one on first sign-in.
    ///
    /// Lookup order: firebase uid, then email (an account registered offline
    /// gets the uid attached), then a fresh row.
    pub fn ensure_linked(&self, firebase_uid: &str, email: &str, nombre: &str) -> AppResult<User> {
        if let Some(user) = self.user_repo.get_by_firebase_uid(firebase_uid)? {
            return Ok(user);
        }

        if let Some(mut user) = self.user_repo.get_by_email(email.trim())? {
            user.apply_changes(UserChanges {
                firebase_uid: Some(Some(firebase_uid.to_string())),
                ..Default::default()
            });
            self.user_repo.update(&user)?;
            log::info!("Linked identity {} to user {}", firebase_uid, user.id);
            self.event_bus.emit(UserUpdated::new(user.id));
            return Ok(user);
        }

        let nombre = if nombre.trim().is_empty() {
            email.split('@').next().unwrap_or(email)
        } else {
            nombre
        };

        self.register_user(RegisterUserRequest {
            email: email.to_string(),
            nombre: nombre.to_string(),
            firebase_uid: Some(firebase_uid.to_string()),
        })
    }
}
