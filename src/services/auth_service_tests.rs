// src/services/auth_service_tests.rs
//
// Auth flows against a mocked identity provider, a temp session file and
// the in-memory document store for cloud profiles.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::infrastructure::SessionStore;
    use crate::integrations::cloud;
    use crate::integrations::identity::MockIdentityProvider;
    use crate::integrations::{AuthenticatedIdentity, Credentials, DocumentStore, InMemoryDocumentStore};
    use crate::services::test_fixtures::Fixture;
    use crate::services::{AuthService, RegisterAccountRequest};

    fn identity(uid: &str, email: &str, display_name: Option<&str>) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn service(fx: &Fixture, provider: MockIdentityProvider, dir: &TempDir) -> AuthService {
        AuthService::new(
            Arc::new(provider),
            fx.users.clone(),
            SessionStore::new(dir.path().join("session.json")),
            fx.bus.clone(),
        )
    }

    fn account(email: &str, password: &str) -> RegisterAccountRequest {
        RegisterAccountRequest {
            credentials: Credentials::new(email, password),
            nombre: "Ana Torres".to_string(),
            universidad: "Universidad Nacional".to_string(),
            carrera: "Ingeniería de Sistemas".to_string(),
            semestre: 5,
        }
    }

    #[tokio::test]
    async fn test_register_links_user_and_stores_session() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_up()
            .withf(|credentials, name| {
                credentials.email == "ana@uni.edu" && name.as_deref() == Some("Ana Torres")
            })
            .times(1)
            .returning(|c, name| Ok(identity("uid-ana", &c.email, name.as_deref())));

        let auth = service(&fx, provider, &dir).with_profiles(cloud::users(store.clone()));
        let session = auth.register(account(" ana@uni.edu ", "secreto1")).await.unwrap();

        let user = fx.users.get_user(session.usuario_id).unwrap().unwrap();
        assert_eq!(user.email, "ana@uni.edu");
        assert_eq!(user.nombre, "Ana Torres");
        assert_eq!(user.firebase_uid.as_deref(), Some("uid-ana"));

        assert_eq!(auth.require_user().unwrap(), user.id);
        assert_eq!(auth.current_session().unwrap(), Some(session));

        let profile = cloud::users(store.clone()).get("uid-ana").await.unwrap().unwrap();
        assert_eq!(profile.data.carrera, "Ingeniería de Sistemas");
        assert_eq!(profile.data.semestre, 5);
        assert!(profile.data.ultimo_acceso.is_some());

        assert!(fx.event_types().contains(&"UserLoggedIn".to_string()));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_without_calling_provider() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();

        let mut provider = MockIdentityProvider::new();
        provider.expect_sign_up().never();

        let auth = service(&fx, provider, &dir);
        let err = auth.register(account("ana@uni.edu", "12345")).await.unwrap_err();

        assert!(
            matches!(&err, AppError::Auth(msg) if msg == "Password must be at least 6 characters"),
            "unexpected error: {err}"
        );
        assert!(fx.users.list_users().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_leaves_no_session() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .returning(|_| Err(AppError::Auth("Incorrect password".to_string())));

        let auth = service(&fx, provider, &dir);
        let err = auth
            .login(Credentials::new("ana@uni.edu", "incorrecta"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(msg) if msg == "Incorrect password"));
        assert_eq!(auth.current_session().unwrap(), None);
        assert!(matches!(auth.require_user(), Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_login_reuses_offline_user_and_tolerates_missing_profile() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();
        let offline = fx.user("ana@uni.edu");
        let store = Arc::new(InMemoryDocumentStore::new());

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .times(1)
            .returning(|c| Ok(identity("uid-ana", &c.email, None)));

        let auth = service(&fx, provider, &dir).with_profiles(cloud::users(store.clone()));
        let session = auth
            .login(Credentials::new("ana@uni.edu", "secreto1"))
            .await
            .unwrap();

        assert_eq!(session.usuario_id, offline);
        assert_eq!(session.identity.uid, "uid-ana");
        // No profile document existed, so nothing was created either
        assert_eq!(store.count("usuarios").await, 0);
    }

    #[tokio::test]
    async fn test_login_refreshes_last_access() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());

        let mut stale = serde_json::Map::new();
        stale.insert("uid".into(), "uid-ana".into());
        stale.insert("email".into(), "ana@uni.edu".into());
        stale.insert("nombre".into(), "Ana".into());
        stale.insert("ultimoAcceso".into(), "2020-01-01T00:00:00Z".into());
        store.set("usuarios", "uid-ana", stale).await.unwrap();

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .returning(|c| Ok(identity("uid-ana", &c.email, Some("Ana"))));

        let auth = service(&fx, provider, &dir).with_profiles(cloud::users(store.clone()));
        auth.login(Credentials::new("ana@uni.edu", "secreto1"))
            .await
            .unwrap();

        let profile = cloud::users(store).get("uid-ana").await.unwrap().unwrap();
        let last = profile.data.ultimo_acceso.unwrap();
        assert!(last > Utc::now() - Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_logout_clears_session_once() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .returning(|c| Ok(identity("uid-ana", &c.email, Some("Ana"))));

        let auth = service(&fx, provider, &dir);
        auth.login(Credentials::new("ana@uni.edu", "secreto1"))
            .await
            .unwrap();

        assert!(auth.logout().unwrap());
        assert!(!auth.logout().unwrap());
        assert_eq!(auth.current_session().unwrap(), None);

        let logouts = fx
            .event_types()
            .into_iter()
            .filter(|t| t == "UserLoggedOut")
            .count();
        assert_eq!(logouts, 1);
    }

    #[tokio::test]
    async fn test_reset_password_validates_email() {
        let fx = Fixture::new();
        let dir = TempDir::new().unwrap();

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_send_password_reset()
            .withf(|email| email == "ana@uni.edu")
            .times(1)
            .returning(|_| Ok(()));

        let auth = service(&fx, provider, &dir);
        auth.reset_password(" ana@uni.edu ").await.unwrap();
        assert!(auth.reset_password("not-an-email").await.is_err());
    }
}
