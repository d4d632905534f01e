use super::*;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::collaborator::Operation;

struct TestAuthService {
    status: Result<bool, String>,
    login_url: Result<String, String>,
    logout: Result<(), String>,
    status_calls: Mutex<u32>,
}

impl TestAuthService {
    fn authenticated(authenticated: bool) -> Self {
        Self {
            status: Ok(authenticated),
            login_url: Ok("https://accounts.google.com/o/oauth2/auth?client_id=abc".into()),
            logout: Ok(()),
            status_calls: Mutex::new(0),
        }
    }

    fn with_status_failure(mut self, message: &str) -> Self {
        self.status = Err(message.into());
        self
    }

    fn with_login_failure(mut self, message: &str) -> Self {
        self.login_url = Err(message.into());
        self
    }

    fn with_logout_failure(mut self, message: &str) -> Self {
        self.logout = Err(message.into());
        self
    }
}

#[async_trait]
impl AuthService for TestAuthService {
    async fn check_status(&self) -> Result<bool, CollaboratorError> {
        *self.status_calls.lock().await += 1;
        self.status
            .clone()
            .map_err(|message| CollaboratorError::remote(Operation::CheckStatus, 500, message))
    }

    async fn login_url(&self) -> Result<Url, CollaboratorError> {
        match &self.login_url {
            Ok(raw) => Ok(Url::parse(raw).expect("test url")),
            Err(message) => Err(CollaboratorError::remote(Operation::LoginUrl, 500, message.clone())),
        }
    }

    async fn logout(&self) -> Result<(), CollaboratorError> {
        self.logout
            .clone()
            .map_err(|message| CollaboratorError::remote(Operation::Logout, 500, message))
    }
}

fn page(raw: &str) -> Url {
    Url::parse(raw).expect("page url")
}

fn orchestrator(service: TestAuthService) -> (AuthOrchestrator, Arc<TestAuthService>) {
    let service = Arc::new(service);
    (AuthOrchestrator::new(service.clone()), service)
}

#[tokio::test]
async fn starts_in_checking_state() {
    let (auth, _) = orchestrator(TestAuthService::authenticated(true));
    assert_eq!(auth.status(), SessionStatus::Checking);
}

#[tokio::test]
async fn initialize_applies_status_check() {
    let (auth, service) = orchestrator(TestAuthService::authenticated(true));

    let effect = auth.initialize(&page("http://localhost:5173/")).await;

    assert_eq!(effect, None);
    assert_eq!(auth.status(), SessionStatus::Authenticated);
    assert_eq!(auth.state().error(), None);
    assert_eq!(*service.status_calls.lock().await, 1);
}

#[tokio::test]
async fn initialize_records_status_check_failure() {
    let (auth, _) = orchestrator(
        TestAuthService::authenticated(true).with_status_failure("Failed to check auth status"),
    );

    auth.initialize(&page("http://localhost:5173/")).await;

    let state = auth.state();
    assert_eq!(state.status(), SessionStatus::Unauthenticated);
    assert_eq!(state.error(), Some("Failed to check auth status"));
}

#[tokio::test]
async fn success_marker_authenticates_and_is_stripped() {
    let (auth, _) = orchestrator(TestAuthService::authenticated(true));

    let effect = auth
        .initialize(&page("http://localhost:5173/upload?auth=success"))
        .await;

    assert_eq!(auth.status(), SessionStatus::Authenticated);
    match effect {
        Some(PageEffect::ReplaceAddress(address)) => {
            assert_eq!(address.as_str(), "http://localhost:5173/upload");
            assert!(!address.as_str().contains("auth="));
        }
        other => panic!("unexpected effect: {other:?}"),
    }
}

#[tokio::test]
async fn error_marker_is_stripped_with_its_message() {
    let (auth, _) = orchestrator(TestAuthService::authenticated(false));

    let effect = auth
        .initialize(&page("http://localhost:5173/?auth=error&message=access_denied"))
        .await;

    assert_eq!(auth.status(), SessionStatus::Unauthenticated);
    assert_eq!(
        effect,
        Some(PageEffect::ReplaceAddress(page("http://localhost:5173/")))
    );
}

#[tokio::test]
async fn callback_marker_is_interpreted_only_once() {
    let (auth, service) = orchestrator(TestAuthService::authenticated(true));
    let callback_page = page("http://localhost:5173/?auth=success");

    assert!(auth.initialize(&callback_page).await.is_some());
    assert_eq!(auth.observe_callback(&callback_page), None);
    assert_eq!(auth.initialize(&callback_page).await, None);
    assert_eq!(*service.status_calls.lock().await, 2);
}

#[tokio::test]
async fn marker_sets_state_before_status_check_completes() {
    let (auth, _) = orchestrator(TestAuthService::authenticated(false));

    auth.store.update(SessionState::begin_check);
    auth.observe_callback(&page("http://localhost:5173/?auth=success"));

    assert_eq!(auth.status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn login_returns_navigation_without_touching_session() {
    let (auth, _) = orchestrator(TestAuthService::authenticated(false));
    auth.initialize(&page("http://localhost:5173/")).await;
    let before = auth.state();

    let effect = auth.login().await.expect("login url");

    assert_eq!(
        effect,
        PageEffect::Navigate(page(
            "https://accounts.google.com/o/oauth2/auth?client_id=abc"
        ))
    );
    assert_eq!(auth.state(), before);
}

#[tokio::test]
async fn failed_login_surfaces_error_without_touching_session() {
    let (auth, _) = orchestrator(
        TestAuthService::authenticated(false).with_login_failure("Failed to get login URL"),
    );
    auth.initialize(&page("http://localhost:5173/")).await;
    let before = auth.state();

    let err = auth.login().await.expect_err("must fail");

    assert_eq!(err.to_string(), "Failed to get login URL");
    assert_eq!(auth.state(), before);
}

#[tokio::test]
async fn logout_unauthenticates() {
    let (auth, _) = orchestrator(TestAuthService::authenticated(true));
    auth.initialize(&page("http://localhost:5173/")).await;
    let mut updates = auth.subscribe();
    let _ = updates.borrow_and_update();

    auth.logout().await;

    assert!(updates.has_changed().expect("store alive"));
    assert_eq!(auth.status(), SessionStatus::Unauthenticated);
    assert_eq!(auth.state().error(), None);
}

#[tokio::test]
async fn failed_logout_keeps_session_and_records_error() {
    let (auth, _) = orchestrator(
        TestAuthService::authenticated(true).with_logout_failure("Failed to logout"),
    );
    auth.initialize(&page("http://localhost:5173/")).await;

    auth.logout().await;

    let state = auth.state();
    assert_eq!(state.status(), SessionStatus::Authenticated);
    assert_eq!(state.error(), Some("Failed to logout"));

    auth.clear_error();
    assert_eq!(auth.state().error(), None);
}

#[tokio::test]
async fn refresh_status_rechecks_without_consuming_callback() {
    let (auth, service) = orchestrator(TestAuthService::authenticated(true));

    auth.refresh_status().await;

    assert_eq!(auth.status(), SessionStatus::Authenticated);
    assert_eq!(*service.status_calls.lock().await, 1);
    assert!(auth
        .observe_callback(&page("http://localhost:5173/?auth=success"))
        .is_some());
}
