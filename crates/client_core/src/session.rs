//! Authentication state and its transitions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Checking,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    fn from_authenticated(authenticated: bool) -> Self {
        if authenticated {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    StatusCheck,
    Logout { resume: SessionStatus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    status: SessionStatus,
    error: Option<String>,
    pending: Option<PendingOp>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Checking,
            error: None,
            pending: Some(PendingOp::StatusCheck),
        }
    }
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn is_logging_out(&self) -> bool {
        matches!(self.pending, Some(PendingOp::Logout { .. }))
    }

    pub fn begin_check(&mut self) {
        self.status = SessionStatus::Checking;
        self.error = None;
        self.pending = Some(PendingOp::StatusCheck);
    }

    /// Used when the OAuth redirect already told us the outcome.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.status = SessionStatus::from_authenticated(authenticated);
        self.error = None;
        self.pending = None;
    }

    pub fn complete_check(&mut self, result: Result<bool, String>) {
        self.pending = None;
        match result {
            Ok(authenticated) => {
                self.status = SessionStatus::from_authenticated(authenticated);
                self.error = None;
            }
            Err(message) => {
                self.status = SessionStatus::Unauthenticated;
                self.error = Some(message);
            }
        }
    }

    pub fn begin_logout(&mut self) {
        let resume = match self.pending {
            Some(PendingOp::Logout { resume }) => resume,
            _ => self.status,
        };
        self.status = SessionStatus::Checking;
        self.error = None;
        self.pending = Some(PendingOp::Logout { resume });
    }

    /// A failed logout keeps whatever status the session had before it.
    pub fn complete_logout(&mut self, result: Result<(), String>) {
        let resume = match self.pending.take() {
            Some(PendingOp::Logout { resume }) => resume,
            _ => self.status,
        };
        match result {
            Ok(()) => {
                self.status = SessionStatus::Unauthenticated;
                self.error = None;
            }
            Err(message) => {
                self.status = match resume {
                    SessionStatus::Checking => SessionStatus::Unauthenticated,
                    settled => settled,
                };
                self.error = Some(message);
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
