//! reqwest-backed implementations of the collaborator traits.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiErrorBody,
    protocol::{
        AuthStatusResponse, FileSearchQuery, FileSummary, LoginUrlResponse, LogoutResponse,
        UploadResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    collaborator::{
        AuthService, CollaboratorError, FileCatalog, Operation, UploadReceipt, UploadService,
    },
    settings::ClientSettings,
    upload::SelectedFile,
};

pub struct HttpCollaborator {
    http: Client,
    api_url: String,
}

impl HttpCollaborator {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn execute(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, CollaboratorError> {
        let response = request
            .send()
            .await
            .map_err(|source| CollaboratorError::Transport { operation, source })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = ApiErrorBody::extract_message(&raw)
            .unwrap_or_else(|| operation.fallback_message().to_string());
        debug!(
            %operation,
            status = status.as_u16(),
            reason = %message,
            "collaborator call rejected"
        );
        Err(CollaboratorError::remote(operation, status.as_u16(), message))
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T, CollaboratorError> {
        self.execute(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| CollaboratorError::malformed(operation, err.to_string()))
    }
}

#[async_trait]
impl AuthService for HttpCollaborator {
    async fn check_status(&self) -> Result<bool, CollaboratorError> {
        let request = self
            .http
            .get(format!("{}/auth/youtube/status", self.api_url));
        let body: AuthStatusResponse = self.execute_json(Operation::CheckStatus, request).await?;
        Ok(body.authenticated)
    }

    async fn login_url(&self) -> Result<Url, CollaboratorError> {
        let request = self.http.get(format!("{}/auth/youtube/login", self.api_url));
        let body: LoginUrlResponse = self.execute_json(Operation::LoginUrl, request).await?;
        Url::parse(&body.auth_url).map_err(|err| {
            CollaboratorError::malformed(
                Operation::LoginUrl,
                format!("invalid auth url '{}': {err}", body.auth_url),
            )
        })
    }

    async fn logout(&self) -> Result<(), CollaboratorError> {
        let request = self
            .http
            .post(format!("{}/auth/youtube/logout", self.api_url));
        let body: LogoutResponse = self.execute_json(Operation::Logout, request).await?;
        if let Some(ack) = body.message {
            debug!(%ack, "logout acknowledged");
        }
        Ok(())
    }
}

#[async_trait]
impl UploadService for HttpCollaborator {
    async fn upload(
        &self,
        file: &SelectedFile,
        secret_key: Option<&str>,
        tags: &[String],
    ) -> Result<UploadReceipt, CollaboratorError> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type).map_err(|source| {
                CollaboratorError::Transport {
                    operation: Operation::Upload,
                    source,
                }
            })?;
        }

        let mut form = Form::new().part("file", part);
        if let Some(secret_key) = secret_key {
            form = form.text("secretKey", secret_key.to_string());
        }
        for tag in tags {
            form = form.text("tags", tag.clone());
        }

        let request = self
            .http
            .post(format!("{}/upload", self.api_url))
            .multipart(form);
        let body: UploadResponse = self.execute_json(Operation::Upload, request).await?;
        receipt_from_response(body)
    }
}

/// The explicit storage path wins; deployments that only report the hosted
/// video are addressed by its URL.
fn receipt_from_response(body: UploadResponse) -> Result<UploadReceipt, CollaboratorError> {
    let storage_path = body
        .storage_path
        .filter(|path| !path.is_empty())
        .or_else(|| body.youtube_video_url.clone())
        .ok_or_else(|| {
            CollaboratorError::malformed(Operation::Upload, "response carried no storage path")
        })?;

    Ok(UploadReceipt {
        storage_path,
        file_id: body.file_id,
        video_url: body.youtube_video_url,
    })
}

#[async_trait]
impl FileCatalog for HttpCollaborator {
    async fn list_files(&self) -> Result<Vec<FileSummary>, CollaboratorError> {
        let request = self.http.get(format!("{}/files", self.api_url));
        self.execute_json(Operation::ListFiles, request).await
    }

    async fn search_files(
        &self,
        query: &FileSearchQuery,
    ) -> Result<Vec<FileSummary>, CollaboratorError> {
        let request = self
            .http
            .get(format!("{}/files/search", self.api_url))
            .query(query);
        self.execute_json(Operation::SearchFiles, request).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
