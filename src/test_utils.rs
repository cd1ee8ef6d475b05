#[cfg(test)]
pub mod fixtures {
    use std::path::Path;

    use crate::{
        app_state::AppState,
        config::Config,
        models::dto::{request::RegisterRequest, response::AuthResponse},
    };

    /// Fresh state over its own in-memory database.
    pub async fn test_state() -> AppState {
        AppState::new(Config::test_config())
            .await
            .expect("test state")
    }

    /// Fresh state whose materials live in `dir`, with the demo catalog seeded.
    pub async fn seeded_state(dir: &Path) -> AppState {
        let mut config = Config::test_config();
        config.materials_dir = dir.to_path_buf();
        config.seed_demo_data = true;

        let state = AppState::new(config).await.expect("test state");
        state.bootstrap().await.expect("seed");
        state
    }

    pub async fn register(state: &AppState, regno: &str) -> AuthResponse {
        state
            .user_service
            .register(RegisterRequest {
                regno: regno.to_string(),
                name: Some(format!("Learner {}", regno)),
                password: "secret".to_string(),
            })
            .await
            .expect("register")
    }

    pub async fn register_admin(state: &AppState, regno: &str) -> AuthResponse {
        let mut response = register(state, regno).await;
        response.user = state
            .user_service
            .set_admin(response.user.id, true)
            .await
            .expect("promote");
        response
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, test};

    /// Builds the full route table over the given [`AppState`].
    macro_rules! init_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new($state.clone()))
                    .configure($crate::handlers::configure),
            )
            .await
        };
    }
    pub(crate) use init_app;

    pub fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
        test::read_body_json(resp).await
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, test_helpers::*};

    #[actix_web::test]
    async fn test_fixture_states_are_isolated() {
        let first = test_state().await;
        let second = test_state().await;

        register(&first, "REG/001").await;

        assert_eq!(first.user_service.list_users().await.unwrap().len(), 1);
        assert!(second.user_service.list_users().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_register_admin_fixture() {
        let state = test_state().await;
        let admin = register_admin(&state, "ADMIN").await;

        assert!(admin.user.is_admin);
        assert!(state.user_service.require_admin(admin.user.id).await.is_ok());
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(bearer("abc"), ("Authorization", "Bearer abc".to_string()));
    }
}
