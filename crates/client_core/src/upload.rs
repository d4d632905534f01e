//! Upload workflow state, the request a user assembles, and local validation.

use shared::domain::format_file_size;
use thiserror::Error;

use crate::session::SessionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

/// Identifies one `begin_upload` call so late completions can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadState {
    phase: UploadPhase,
    result_path: Option<String>,
    error: Option<String>,
    generation: u64,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            phase: UploadPhase::Idle,
            result_path: None,
            error: None,
            generation: 0,
        }
    }
}

impl UploadState {
    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn result_path(&self) -> Option<&str> {
        self.result_path.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    pub fn reset(&mut self) {
        self.phase = UploadPhase::Idle;
        self.result_path = None;
        self.error = None;
    }

    /// Returns `None` unless the phase is `Idle` or `Failed`.
    pub fn begin_upload(&mut self) -> Option<UploadTicket> {
        if !matches!(self.phase, UploadPhase::Idle | UploadPhase::Failed) {
            return None;
        }
        self.generation += 1;
        self.phase = UploadPhase::Uploading;
        self.result_path = None;
        self.error = None;
        Some(UploadTicket(self.generation))
    }

    /// Applies a collaborator result. Returns `false` when the result belongs
    /// to an upload that was reset or superseded in the meantime.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<String, String>,
    ) -> bool {
        if self.phase != UploadPhase::Uploading || ticket.0 != self.generation {
            return false;
        }
        match result {
            Ok(path) => {
                self.phase = UploadPhase::Succeeded;
                self.result_path = Some(path);
            }
            Err(message) => {
                self.phase = UploadPhase::Failed;
                self.error = Some(message);
            }
        }
        true
    }
}

/// A file picked by the user, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: Option<SelectedFile>,
    pub encrypt: bool,
    pub secret_key: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("no file selected")]
    NoFileSelected,
    #[error("secret key required")]
    SecretKeyRequired,
    #[error("upload already in progress")]
    UploadInProgress,
    #[error("file already uploaded; select a new file")]
    AlreadyUploaded,
}

impl UploadRequest {
    /// Checks preconditions in a fixed order so an earlier failure is never
    /// masked by a later one: session, then file, then key.
    pub fn validate(&self, session: SessionStatus) -> Result<&SelectedFile, UploadRejection> {
        if session != SessionStatus::Authenticated {
            return Err(UploadRejection::AuthenticationRequired);
        }
        let file = self.file.as_ref().ok_or(UploadRejection::NoFileSelected)?;
        if self.encrypt && self.secret_key().is_none() {
            return Err(UploadRejection::SecretKeyRequired);
        }
        Ok(file)
    }

    /// The key to transmit: only when encryption is requested and non-empty.
    pub fn secret_key(&self) -> Option<&str> {
        if !self.encrypt {
            return None;
        }
        self.secret_key.as_deref().filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
