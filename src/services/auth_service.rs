// src/services/auth_service.rs
//
// Sign-up, sign-in and sign-out through the external identity provider.
//
// Every authenticated identity is linked to a local `usuarios` row, and the
// active session is persisted so later commands know who is signed in.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::domain::user::invariants::validate_email;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, UserLoggedIn, UserLoggedOut};
use crate::infrastructure::{Session, SessionStore};
use crate::integrations::cloud::{CloudCollection, CloudUserProfile};
use crate::integrations::{AuthenticatedIdentity, Credentials, IdentityProvider};
use crate::services::user_service::UserService;

#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    pub credentials: Credentials,
    pub nombre: String,
    pub universidad: String,
    pub carrera: String,
    pub semestre: u8,
}

pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    user_service: Arc<UserService>,
    sessions: SessionStore,
    profiles: Option<CloudCollection<CloudUserProfile>>,
    event_bus: Arc<EventBus>,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        user_service: Arc<UserService>,
        sessions: SessionStore,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            user_service,
            sessions,
            profiles: None,
            event_bus,
        }
    }

    /// Also keep the cloud profile document (`usuarios/{uid}`) up to date
    pub fn with_profiles(mut self, profiles: CloudCollection<CloudUserProfile>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub async fn register(&self, request: RegisterAccountRequest) -> AppResult<Session> {
        request.credentials.validate()?;
        let nombre = request.nombre.trim().to_string();
        if nombre.is_empty() {
            return Err(AppError::Auth("Name is required".to_string()));
        }

        let identity = self
            .provider
            .sign_up(request.credentials.clone(), Some(nombre.clone()))
            .await?;
        log::info!("Created account {} for {}", identity.uid, identity.email);

        let user = self
            .user_service
            .ensure_linked(&identity.uid, &identity.email, &nombre)?;

        if let Some(profiles) = &self.profiles {
            let now = Utc::now();
            let profile = CloudUserProfile {
                uid: identity.uid.clone(),
                email: identity.email.clone(),
                nombre,
                universidad: request.universidad,
                carrera: request.carrera,
                semestre: request.semestre,
                fecha_creacion: Some(now),
                ultimo_acceso: Some(now),
            };
            if let Err(e) = profiles.set(&identity.uid, &profile).await {
                log::warn!("Could not store cloud profile for {}: {}", identity.uid, e);
            }
        }

        self.start_session(user.id, identity)
    }

    pub async fn login(&self, credentials: Credentials) -> AppResult<Session> {
        credentials.validate()?;

        let identity = self.provider.sign_in(credentials).await?;
        let nombre = identity.display_name.clone().unwrap_or_default();
        let user = self
            .user_service
            .ensure_linked(&identity.uid, &identity.email, &nombre)?;

        if let Some(profiles) = &self.profiles {
            let mut patch = Map::new();
            patch.insert(
                "ultimoAcceso".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
            if let Err(e) = profiles.update(&identity.uid, patch).await {
                log::debug!("Could not update last access of {}: {}", identity.uid, e);
            }
        }

        self.start_session(user.id, identity)
    }

    /// Ends the current session. Returns whether one was active.
    pub fn logout(&self) -> AppResult<bool> {
        let session = self.sessions.load()?;
        self.sessions.clear()?;

        match session {
            Some(session) => {
                log::info!("User {} signed out", session.usuario_id);
                self.event_bus.emit(UserLoggedOut::new(session.usuario_id));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn reset_password(&self, email: &str) -> AppResult<()> {
        validate_email(email)?;
        self.provider
            .send_password_reset(email.trim().to_string())
            .await?;
        log::info!("Password reset email requested for {}", email.trim());
        Ok(())
    }

    pub fn current_session(&self) -> AppResult<Option<Session>> {
        self.sessions.load()
    }

    /// Local user id of the signed-in user
    pub fn require_user(&self) -> AppResult<i64> {
        self.sessions
            .load()?
            .map(|session| session.usuario_id)
            .ok_or_else(|| AppError::Auth("Not signed in. Run `auth login` first".to_string()))
    }

    fn start_session(&self, usuario_id: i64, identity: AuthenticatedIdentity) -> AppResult<Session> {
        let firebase_uid = identity.uid.clone();
        let session = Session::new(usuario_id, identity);
        self.sessions.save(&session)?;

        self.event_bus
            .emit(UserLoggedIn::new(usuario_id, firebase_uid));
        Ok(session)
    }
}
