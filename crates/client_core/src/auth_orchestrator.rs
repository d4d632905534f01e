//! Drives the session store from the authentication service and the OAuth
//! redirect round-trip.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::watch;
use tracing::{info, warn};
use url::Url;

use crate::{
    callback::{
        interpret_callback, query_params, strip_callback_marker, CallbackOutcome, PageEffect,
    },
    collaborator::{AuthService, CollaboratorError},
    session::{SessionState, SessionStatus},
    store::Store,
};

pub struct AuthOrchestrator {
    auth: Arc<dyn AuthService>,
    store: Store<SessionState>,
    callback_consumed: AtomicBool,
}

impl AuthOrchestrator {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self {
            auth,
            store: Store::new(SessionState::default()),
            callback_consumed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn status(&self) -> SessionStatus {
        self.store.snapshot().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    /// Page start: checks the session and consumes a pending OAuth callback.
    ///
    /// The returned effect, if any, rewrites the address to drop the marker.
    /// The status check result is applied last, so the service has the final
    /// word over the redirect marker.
    pub async fn initialize(&self, page_url: &Url) -> Option<PageEffect> {
        self.store.update(SessionState::begin_check);
        let effect = self.observe_callback(page_url);
        self.finish_status_check().await;
        effect
    }

    /// Interprets the callback marker the first time it is called; later
    /// calls are ignored.
    pub fn observe_callback(&self, page_url: &Url) -> Option<PageEffect> {
        if self.callback_consumed.swap(true, Ordering::SeqCst) {
            return None;
        }

        let outcome = interpret_callback(&query_params(page_url))?;
        match &outcome {
            CallbackOutcome::Succeeded => info!("oauth callback reported success"),
            CallbackOutcome::Failed { message } => {
                warn!(
                    reason = message.as_deref().unwrap_or(""),
                    "oauth callback reported failure"
                )
            }
        }
        self.store
            .update(|state| state.set_authenticated(outcome.authenticated()));
        Some(PageEffect::ReplaceAddress(strip_callback_marker(page_url)))
    }

    pub async fn refresh_status(&self) {
        self.store.update(SessionState::begin_check);
        self.finish_status_check().await;
    }

    async fn finish_status_check(&self) {
        let result = self.auth.check_status().await.map_err(|err| {
            warn!(error = %err, "auth status check failed");
            err.to_string()
        });
        if let Ok(authenticated) = result {
            info!(authenticated, "auth status checked");
        }
        self.store.update(|state| state.complete_check(result));
    }

    /// Fetches the provider login URL. Success is terminal for the page: the
    /// caller navigates away, so the session store is left untouched either way.
    pub async fn login(&self) -> Result<PageEffect, CollaboratorError> {
        match self.auth.login_url().await {
            Ok(auth_url) => {
                info!(
                    host = auth_url.host_str().unwrap_or(""),
                    "redirecting to oauth provider"
                );
                Ok(PageEffect::Navigate(auth_url))
            }
            Err(err) => {
                warn!(error = %err, "failed to get login url");
                Err(err)
            }
        }
    }

    pub async fn logout(&self) {
        self.store.update(SessionState::begin_logout);
        let result = self.auth.logout().await.map_err(|err| {
            warn!(error = %err, "logout failed");
            err.to_string()
        });
        if result.is_ok() {
            info!("logged out");
        }
        self.store.update(|state| state.complete_logout(result));
    }

    pub fn clear_error(&self) {
        self.store.update(SessionState::clear_error);
    }
}

#[cfg(test)]
#[path = "tests/auth_orchestrator_tests.rs"]
mod tests;
