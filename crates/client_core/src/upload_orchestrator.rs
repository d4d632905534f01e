//! Validates upload requests locally and drives the upload store through the
//! storage service.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    collaborator::UploadService,
    session::SessionStatus,
    store::Store,
    upload::{UploadPhase, UploadRejection, UploadRequest, UploadState},
};

pub struct UploadOrchestrator {
    uploader: Arc<dyn UploadService>,
    store: Store<UploadState>,
}

impl UploadOrchestrator {
    pub fn new(uploader: Arc<dyn UploadService>) -> Self {
        Self {
            uploader,
            store: Store::new(UploadState::default()),
        }
    }

    pub fn state(&self) -> UploadState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.store.subscribe()
    }

    /// A new file starts a fresh workflow. Refused while an upload is running.
    pub fn select_file(&self) -> Result<(), UploadRejection> {
        let accepted = self.store.update(|state| {
            if state.is_uploading() {
                return false;
            }
            state.reset();
            true
        });
        if accepted {
            Ok(())
        } else {
            Err(UploadRejection::UploadInProgress)
        }
    }

    /// Explicit clear. Always allowed; an in-flight result is then dropped.
    pub fn clear(&self) {
        self.store.update(UploadState::reset);
    }

    /// Runs the upload workflow for `request`.
    ///
    /// Precondition failures return `Err` without touching the store or the
    /// network. Otherwise the collaborator outcome lands in the store and the
    /// resulting snapshot is returned.
    pub async fn submit(
        &self,
        request: &UploadRequest,
        session: SessionStatus,
    ) -> Result<UploadState, UploadRejection> {
        let file = request.validate(session).inspect_err(|rejection| {
            debug!(%rejection, "upload rejected before submission");
        })?;

        let ticket = match self.store.update(UploadState::begin_upload) {
            Some(ticket) => ticket,
            None => {
                let rejection = match self.store.snapshot().phase() {
                    UploadPhase::Succeeded => UploadRejection::AlreadyUploaded,
                    _ => UploadRejection::UploadInProgress,
                };
                debug!(%rejection, "upload rejected before submission");
                return Err(rejection);
            }
        };

        info!(
            file = %file.name,
            size_bytes = file.size_bytes(),
            encrypted = request.secret_key().is_some(),
            "uploading file"
        );
        let result = self
            .uploader
            .upload(file, request.secret_key(), &request.tags)
            .await
            .map(|receipt| {
                info!(
                    storage_path = %receipt.storage_path,
                    file_id = receipt.file_id.map(|id| id.0),
                    video_url = receipt.video_url.as_deref(),
                    "upload stored"
                );
                receipt.storage_path
            })
            .map_err(|err| {
                warn!(error = %err, file = %file.name, "upload failed");
                err.to_string()
            });

        let applied = self
            .store
            .update(|state| state.complete_upload(ticket, result));
        if !applied {
            debug!(file = %file.name, "discarding result of superseded upload");
        }
        Ok(self.store.snapshot())
    }
}

#[cfg(test)]
#[path = "tests/upload_orchestrator_tests.rs"]
mod tests;
