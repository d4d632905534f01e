//! Remote services the orchestrators talk to.

use std::fmt;

use async_trait::async_trait;
use shared::{
    domain::FileId,
    error::ErrorCode,
    protocol::{FileSearchQuery, FileSummary},
};
use thiserror::Error;
use url::Url;

use crate::upload::SelectedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CheckStatus,
    LoginUrl,
    Logout,
    Upload,
    ListFiles,
    SearchFiles,
}

impl Operation {
    /// Shown to the user when the service gives no usable reason.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::CheckStatus => "Failed to check auth status",
            Self::LoginUrl => "Failed to get login URL",
            Self::Logout => "Failed to logout",
            Self::Upload => "Failed to upload file",
            Self::ListFiles => "Failed to list files",
            Self::SearchFiles => "Failed to search files",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fallback_message())
    }
}

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{message}")]
    Remote {
        operation: Operation,
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("{operation}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation}: {detail}")]
    MalformedResponse { operation: Operation, detail: String },
}

impl CollaboratorError {
    pub fn remote(operation: Operation, status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            operation,
            status,
            code: ErrorCode::from_status(status),
            message: message.into(),
        }
    }

    pub fn malformed(operation: Operation, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            detail: detail.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Remote { operation, .. }
            | Self::Transport { operation, .. }
            | Self::MalformedResponse { operation, .. } => *operation,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::Remote {
                code: ErrorCode::Unauthorized,
                ..
            }
        )
    }
}

/// Where the storage service put an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub storage_path: String,
    pub file_id: Option<FileId>,
    pub video_url: Option<String>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn check_status(&self) -> Result<bool, CollaboratorError>;
    async fn login_url(&self) -> Result<Url, CollaboratorError>;
    async fn logout(&self) -> Result<(), CollaboratorError>;
}

#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(
        &self,
        file: &SelectedFile,
        secret_key: Option<&str>,
        tags: &[String],
    ) -> Result<UploadReceipt, CollaboratorError>;
}

#[async_trait]
pub trait FileCatalog: Send + Sync {
    async fn list_files(&self) -> Result<Vec<FileSummary>, CollaboratorError>;
    async fn search_files(
        &self,
        query: &FileSearchQuery,
    ) -> Result<Vec<FileSummary>, CollaboratorError>;
}
